//! Response envelope used by most admin endpoints.

use serde::{Deserialize, Serialize};

/// Standard `{ success, message, data }` wrapper.
///
/// Older endpoints omit `success`; both flags are therefore optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub data: T,
}

impl<T> ApiEnvelope<T> {
    /// Wrap `data` in a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: Some(true),
            message: None,
            data,
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

/// Body of `POST /admin/login`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub password: String,
}

/// Bare `{ "message": ... }` body returned by errors and simple acknowledgements
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageBody {
    #[serde(default)]
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
