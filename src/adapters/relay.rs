//! Contact form relay
//!
//! Forwards validated contact submissions to a third-party form endpoint
//! (Formspree-style: JSON body, 2xx on acceptance).

use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::adapters::traits::{BackendError, BackendResult};
use crate::contact::ContactSubmission;

#[derive(Clone)]
pub struct FormRelay {
    client: Client,
    url: Option<String>,
}

impl FormRelay {
    pub fn new(url: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    "Failed to build HTTP client with custom config: {}. Using default.",
                    e
                );
                Client::default()
            });

        Self {
            client,
            url: url.filter(|u| !u.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    pub async fn submit(&self, submission: &ContactSubmission) -> BackendResult<()> {
        let Some(url) = &self.url else {
            return Err(BackendError::NotConfigured(
                "contact form relay is not configured".to_string(),
            ));
        };

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(submission)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!("Contact submission relayed");
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            warn!(%status, "Form relay rejected submission: {}", message);
            Err(BackendError::Status {
                status: status.as_u16(),
                message: if message.is_empty() {
                    "form relay rejected the submission".to_string()
                } else {
                    message
                },
            })
        }
    }
}
