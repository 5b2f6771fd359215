//! Errors surfaced to the browser client.

/// Failure of one request from the console to its own `/api` surface.
///
/// Kept `Clone` so a single failed fetch can be handed to every caller that
/// was waiting on the same deduplicated query.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP response (offline, DNS, aborted).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error, preferring the `message` field of a JSON body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<bettim_dto::MessageBody>(body)
            .ok()
            .map(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() || trimmed.len() > 200 {
                    format!("Request failed with status {status}")
                } else {
                    trimmed.to_string()
                }
            });
        ApiError::Status { status, message }
    }

    /// The server rejected the session (redirect to login)
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }

    /// Message suitable for a banner
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
