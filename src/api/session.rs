//! Per-browser admin session cookie
//!
//! Login stores the remote API's cookies inside one `HttpOnly` cookie scoped to
//! this console. Protected handlers take a [`Credential`] argument, so a request
//! without that cookie is answered with 401 before the remote API is contacted.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bettim_dto::MessageBody;

use crate::adapters::{BackendError, BackendResult, Credential};

/// Name of the console's session cookie
pub const SESSION_COOKIE: &str = "bettim_admin_session";

/// Matches the 24 hour client-side session lifetime
pub const SESSION_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// `Set-Cookie` value that removes the session cookie
pub const CLEARED_COOKIE: &str =
    "bettim_admin_session=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0";

/// `Set-Cookie` value carrying `credential`
pub fn issue_cookie(credential: &Credential) -> BackendResult<HeaderValue> {
    let value = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        SESSION_COOKIE,
        urlencoding::encode(credential.as_str()),
        SESSION_MAX_AGE_SECS
    );
    HeaderValue::from_str(&value).map_err(|e| BackendError::Decode(e.to_string()))
}

pub fn cleared_cookie() -> HeaderValue {
    HeaderValue::from_static(CLEARED_COOKIE)
}

/// Find the session cookie among the request's `Cookie` headers
pub fn credential_from_headers(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .filter(|value| !value.is_empty())
        .map(|value| Credential::new(value.into_owned()))
}

impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        credential_from_headers(&parts.headers).ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(MessageBody::new("Not authenticated")),
            )
                .into_response()
        })
    }
}
