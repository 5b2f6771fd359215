//! Bettim admin REST client
//!
//! One configured `reqwest` client shared by every feature. Every admin path
//! is prefixed with the API version (`/{version}/admin/...`). The client keeps
//! no cookie jar: `login` hands the issued cookies back as a [`Credential`] and
//! every later call sends the caller's own.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bettim_dto::{
    AllJobsGrouped, AllSchedulersGrouped, ApiEnvelope, DashboardEvents, Event, JobState,
    LiveEventConfig, LoginRequest, MessageBody, TeamStatsResponse, TeamStatsUpdate,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, SET_COOKIE};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::adapters::traits::{AdminBackend, BackendError, BackendResult, Credential};
use crate::config::Config;

/// HTTP client for the remote admin API
#[derive(Clone)]
pub struct BettimClient {
    client: Client,
    base_url: Url,
    version: String,
}

impl BettimClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::from_parts(
            &config.api_base_url,
            &config.api_version,
            config.request_timeout(),
        )
    }

    pub fn from_parts(base_url: &str, version: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL cannot carry a path: {}", base_url));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            version: version.trim_matches('/').to_string(),
        })
    }

    /// Build `{base}/{version}/admin/{segments...}?{query}` with each segment encoded
    pub fn admin_url(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            if !self.version.is_empty() {
                path.push(&self.version);
            }
            path.push("admin");
            path.extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Admin API request");
        self.client.request(method, url)
    }

    fn authorized(&self, credential: &Credential, method: Method, url: Url) -> RequestBuilder {
        self.request(method, url)
            .header(COOKIE, credential.as_str())
    }

    async fn execute(&self, request: RequestBuilder) -> BackendResult<Vec<u8>> {
        self.exchange(request).await.map(|(_, body)| body)
    }

    /// Send and classify the status; headers and the undecoded body are returned
    async fn exchange(&self, request: RequestBuilder) -> BackendResult<(HeaderMap, Vec<u8>)> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        debug!(%status, %url, bytes = body.len(), "Admin API response");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }

        if !status.is_success() {
            let message = serde_json::from_slice::<MessageBody>(&body)
                .ok()
                .map(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            warn!(%status, %url, "Admin API error: {}", message);
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok((headers, body.to_vec()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        url: Url,
    ) -> BackendResult<T> {
        let body = self
            .execute(self.authorized(credential, Method::GET, url))
            .await?;
        decode(&body)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        credential: &Credential,
        method: Method,
        url: Url,
        body: &B,
    ) -> BackendResult<Vec<u8>> {
        self.execute(self.authorized(credential, method, url).json(body))
            .await
    }

    async fn delete(&self, credential: &Credential, url: Url) -> BackendResult<()> {
        self.execute(self.authorized(credential, Method::DELETE, url))
            .await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> BackendResult<T> {
    serde_json::from_slice(body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// The live-event config endpoint answers with the bare record, `null`, an
/// empty body, or (newer deployments) an envelope around either. An object
/// that is neither a record nor carries `data` is rejected.
pub fn parse_live_config(body: &[u8]) -> BackendResult<Option<LiveEventConfig>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: serde_json::Value = decode(body)?;
    let parsed = match value {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Object(ref fields) if fields.contains_key("data") => {
            serde_json::from_value::<ApiEnvelope<Option<LiveEventConfig>>>(value)
                .map(ApiEnvelope::into_data)
        }
        other => serde_json::from_value::<LiveEventConfig>(other).map(Some),
    };
    parsed.map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait]
impl AdminBackend for BettimClient {
    async fn login(&self, password: &str) -> BackendResult<Credential> {
        let url = self.admin_url(&["login"], &[]);
        let body = LoginRequest {
            password: password.to_string(),
        };
        let request = self.request(Method::POST, url).json(&body);
        let (headers, _) = match self.exchange(request).await {
            Ok(reply) => reply,
            Err(BackendError::Unauthorized) => return Err(BackendError::InvalidPassword),
            Err(e) => return Err(e),
        };
        let cookies = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok());
        Credential::from_set_cookie(cookies).ok_or_else(|| {
            BackendError::Decode("login response did not set a session cookie".to_string())
        })
    }

    async fn dashboard(&self, credential: &Credential) -> BackendResult<DashboardEvents> {
        let url = self.admin_url(&["events", "dashboard"], &[]);
        let envelope: ApiEnvelope<DashboardEvents> = self.get_json(credential, url).await?;
        Ok(envelope.into_data())
    }

    async fn create_event(&self, credential: &Credential, event: &Event) -> BackendResult<()> {
        let url = self.admin_url(&["events"], &[]);
        self.send_json(credential, Method::POST, url, event).await?;
        Ok(())
    }

    async fn delete_event(&self, credential: &Credential, event_id: &str) -> BackendResult<()> {
        self.delete(credential, self.admin_url(&["events", event_id], &[]))
            .await
    }

    async fn jobs(&self, credential: &Credential) -> BackendResult<AllJobsGrouped> {
        let url = self.admin_url(&["bullmq", "jobs"], &[]);
        let envelope: ApiEnvelope<AllJobsGrouped> = self.get_json(credential, url).await?;
        Ok(envelope.into_data())
    }

    async fn remove_job(
        &self,
        credential: &Credential,
        job_id: &str,
        queue_name: &str,
    ) -> BackendResult<()> {
        let url = self.admin_url(&["bullmq", "jobs", job_id], &[("queueName", queue_name)]);
        self.delete(credential, url).await
    }

    async fn clear_queue(
        &self,
        credential: &Credential,
        queue_name: &str,
        state: Option<JobState>,
    ) -> BackendResult<()> {
        let segments = ["bullmq", "queues", queue_name, "jobs"];
        let url = match state {
            Some(state) => self.admin_url(&segments, &[("state", state.as_str())]),
            None => self.admin_url(&segments, &[]),
        };
        self.delete(credential, url).await
    }

    async fn schedulers(&self, credential: &Credential) -> BackendResult<AllSchedulersGrouped> {
        let url = self.admin_url(&["bullmq", "schedulers"], &[]);
        let envelope: ApiEnvelope<AllSchedulersGrouped> = self.get_json(credential, url).await?;
        Ok(envelope.into_data())
    }

    async fn remove_scheduler(
        &self,
        credential: &Credential,
        scheduler_id: &str,
        queue_name: &str,
    ) -> BackendResult<()> {
        let url = self.admin_url(
            &["bullmq", "schedulers", scheduler_id],
            &[("queueName", queue_name)],
        );
        self.delete(credential, url).await
    }

    async fn live_event_config(
        &self,
        credential: &Credential,
    ) -> BackendResult<Option<LiveEventConfig>> {
        let url = self.admin_url(&["dashboard", "live-event", "config"], &[]);
        let body = self
            .execute(self.authorized(credential, Method::GET, url))
            .await?;
        parse_live_config(&body)
    }

    async fn update_live_event_config(
        &self,
        credential: &Credential,
        config: &LiveEventConfig,
    ) -> BackendResult<LiveEventConfig> {
        let url = self.admin_url(&["dashboard", "live-event", "config"], &[]);
        let body = self.send_json(credential, Method::POST, url, config).await?;
        // The write succeeded; an odd reply only costs us the echoed record
        match parse_live_config(&body) {
            Ok(Some(saved)) => Ok(saved),
            Ok(None) => Ok(*config),
            Err(e) => {
                warn!("Live event config saved but reply was not understood: {}", e);
                Ok(*config)
            }
        }
    }

    async fn delete_live_event_config(&self, credential: &Credential) -> BackendResult<()> {
        let url = self.admin_url(&["dashboard", "live-event", "config"], &[]);
        self.delete(credential, url).await
    }

    async fn team_stats(&self, credential: &Credential) -> BackendResult<TeamStatsResponse> {
        self.get_json(credential, self.admin_url(&["ncaa-team-stats"], &[]))
            .await
    }

    async fn update_team_stats(
        &self,
        credential: &Credential,
        update: &TeamStatsUpdate,
    ) -> BackendResult<()> {
        let url = self.admin_url(&["ncaa-team-stats"], &[]);
        self.send_json(credential, Method::PATCH, url, update).await?;
        Ok(())
    }
}
