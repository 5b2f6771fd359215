//! AdminBackend trait - the remote admin API as seen by the `/api` surface

use async_trait::async_trait;
use bettim_dto::{
    AllJobsGrouped, AllSchedulersGrouped, DashboardEvents, Event, JobState, LiveEventConfig,
    TeamStatsResponse, TeamStatsUpdate,
};

/// Failure talking to the remote admin API
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// Login was refused
    #[error("invalid password")]
    InvalidPassword,

    /// The remote API rejected our credential (401/403)
    #[error("not authenticated with the admin API")]
    Unauthorized,

    /// The remote API answered with a non-success status
    #[error("admin API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, TLS, or timeout failure
    #[error("admin API unreachable: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("unexpected admin API response: {0}")]
    Decode(String),

    /// Server-side configuration prevents the call
    #[error("{0}")]
    NotConfigured(String),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Session cookies the remote API issued to one admin login.
///
/// Held as a ready-to-send `Cookie` header value (`a=1; b=2`). Each browser
/// carries its own, so the proxy never acts on behalf of a caller that did
/// not log in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(cookie_header: impl Into<String>) -> Self {
        Self(cookie_header.into())
    }

    /// Collect the `name=value` pairs from `Set-Cookie` header values.
    ///
    /// Attributes (`Path`, `HttpOnly`, ...) are dropped. `None` when no pair is present.
    pub fn from_set_cookie<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let pairs: Vec<&str> = values
            .into_iter()
            .filter_map(|value| value.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.split_once('=').is_some_and(|(name, _)| !name.is_empty()))
            .collect();
        (!pairs.is_empty()).then(|| Self(pairs.join("; ")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep cookie values out of logs
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Operations of the remote admin API.
///
/// Implemented by the HTTP client for production and by in-memory fakes in tests.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// Exchange the admin password for a credential
    async fn login(&self, password: &str) -> BackendResult<Credential>;

    async fn dashboard(&self, credential: &Credential) -> BackendResult<DashboardEvents>;
    async fn create_event(&self, credential: &Credential, event: &Event) -> BackendResult<()>;
    async fn delete_event(&self, credential: &Credential, event_id: &str) -> BackendResult<()>;

    async fn jobs(&self, credential: &Credential) -> BackendResult<AllJobsGrouped>;
    async fn remove_job(
        &self,
        credential: &Credential,
        job_id: &str,
        queue_name: &str,
    ) -> BackendResult<()>;
    async fn clear_queue(
        &self,
        credential: &Credential,
        queue_name: &str,
        state: Option<JobState>,
    ) -> BackendResult<()>;

    async fn schedulers(&self, credential: &Credential) -> BackendResult<AllSchedulersGrouped>;
    async fn remove_scheduler(
        &self,
        credential: &Credential,
        scheduler_id: &str,
        queue_name: &str,
    ) -> BackendResult<()>;

    async fn live_event_config(
        &self,
        credential: &Credential,
    ) -> BackendResult<Option<LiveEventConfig>>;
    async fn update_live_event_config(
        &self,
        credential: &Credential,
        config: &LiveEventConfig,
    ) -> BackendResult<LiveEventConfig>;
    async fn delete_live_event_config(&self, credential: &Credential) -> BackendResult<()>;

    async fn team_stats(&self, credential: &Credential) -> BackendResult<TeamStatsResponse>;
    async fn update_team_stats(
        &self,
        credential: &Credential,
        update: &TeamStatsUpdate,
    ) -> BackendResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_keeps_only_cookie_pairs() {
        let credential = Credential::from_set_cookie([
            "connect.sid=abc%3D; Path=/; HttpOnly",
            "region=eu",
            "; Path=/",
        ])
        .unwrap();
        assert_eq!(credential.as_str(), "connect.sid=abc%3D; region=eu");
        assert_eq!(format!("{:?}", credential), "Credential(..)");
    }

    #[test]
    fn test_credential_requires_a_cookie() {
        assert!(Credential::from_set_cookie(Vec::<&str>::new()).is_none());
        assert!(Credential::from_set_cookie(["=orphan; Path=/", "garbage"]).is_none());
    }
}
