//! Fetch helpers for the same-origin `/api` surface.
//!
//! In the browser requests go through `window.fetch`. During server rendering
//! they go through `reqwest` to the server's own listener (see
//! [`set_server_origin`]).

use bettim_dto::{
    AllJobsGrouped, AllSchedulersGrouped, DashboardEvents, Event, JobState, LiveEventConfig,
    LoginRequest, TeamStatsResponse, TeamStatsUpdate,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use urlencoding::encode;

use crate::contact::ContactSubmission;
use crate::error::{ApiError, Result};

#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
static SERVER_ORIGIN: std::sync::OnceLock<String> = std::sync::OnceLock::new();

/// Origin used for fetches issued while rendering on the server
#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
pub fn set_server_origin(origin: String) {
    let _ = SERVER_ORIGIN.set(origin);
}

#[cfg(target_arch = "wasm32")]
async fn transport(method: &str, path: &str, body: Option<String>) -> Result<(u16, String)> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    fn js_err(e: JsValue) -> ApiError {
        ApiError::Network(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
    }

    let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".to_string()))?;

    let headers = web_sys::Headers::new().map_err(js_err)?;
    headers.set("Accept", "application/json").map_err(js_err)?;

    let init = web_sys::RequestInit::new();
    init.set_method(method);
    if let Some(body) = &body {
        headers.set("Content-Type", "application/json").map_err(js_err)?;
        init.set_body(&JsValue::from_str(body));
    }
    init.set_headers(&headers);

    let request = web_sys::Request::new_with_str_and_init(path, &init).map_err(js_err)?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;

    Ok((response.status(), text.as_string().unwrap_or_default()))
}

#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
async fn transport(method: &str, path: &str, body: Option<String>) -> Result<(u16, String)> {
    let origin = SERVER_ORIGIN
        .get()
        .ok_or_else(|| ApiError::Network("server origin not set".to_string()))?;
    let method = reqwest::Method::from_bytes(method.as_bytes())
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let mut request = reqwest::Client::new()
        .request(method, format!("{}{}", origin, path))
        .header(reqwest::header::ACCEPT, "application/json");
    if let Some(body) = body {
        request = request
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
    }

    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    Ok((status, text))
}

#[cfg(all(not(target_arch = "wasm32"), not(feature = "server")))]
async fn transport(_method: &str, path: &str, _body: Option<String>) -> Result<(u16, String)> {
    Err(ApiError::Network(format!("no HTTP transport for {}", path)))
}

async fn send(method: &str, path: &str, body: Option<String>) -> Result<String> {
    let (status, text) = transport(method, path, body).await?;
    debug!(method, path, status, "API response");
    if (200..300).contains(&status) {
        Ok(text)
    } else {
        Err(ApiError::from_status(status, &text))
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String> {
    serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

pub async fn fetch_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    decode(&send("GET", path, None).await?)
}

pub async fn fetch_text(path: &str) -> Result<String> {
    send("GET", path, None).await
}

pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(path: &str, body: &B) -> Result<T> {
    decode(&send("POST", path, Some(encode_body(body)?)).await?)
}

/// Send a JSON body and ignore the response body
pub async fn send_json_no_response<B: Serialize + ?Sized>(
    method: &str,
    path: &str,
    body: &B,
) -> Result<()> {
    send(method, path, Some(encode_body(body)?)).await?;
    Ok(())
}

pub async fn delete(path: &str) -> Result<()> {
    send("DELETE", path, None).await?;
    Ok(())
}

// Typed endpoints

pub const DASHBOARD_PATH: &str = "/api/events/dashboard";
pub const JOBS_PATH: &str = "/api/jobs";
pub const SCHEDULERS_PATH: &str = "/api/schedulers";
pub const LIVE_CONFIG_PATH: &str = "/api/live-event/config";
pub const TEAM_STATS_PATH: &str = "/api/team-stats";

pub async fn login(password: &str) -> Result<()> {
    let body = LoginRequest {
        password: password.to_string(),
    };
    send_json_no_response("POST", "/api/login", &body).await
}

/// Drop the server-held session cookie
pub async fn logout() -> Result<()> {
    send("POST", "/api/logout", None).await?;
    Ok(())
}

pub async fn dashboard() -> Result<DashboardEvents> {
    fetch_json(DASHBOARD_PATH).await
}

pub async fn create_event(event: &Event) -> Result<()> {
    send_json_no_response("POST", "/api/events", event).await
}

pub async fn delete_event(event_id: &str) -> Result<()> {
    delete(&format!("/api/events/{}", encode(event_id))).await
}

pub async fn jobs() -> Result<AllJobsGrouped> {
    fetch_json(JOBS_PATH).await
}

pub async fn remove_job(job_id: &str, queue_name: &str) -> Result<()> {
    delete(&format!(
        "/api/jobs/{}?queueName={}",
        encode(job_id),
        encode(queue_name)
    ))
    .await
}

pub async fn clear_queue(queue_name: &str, state: Option<JobState>) -> Result<()> {
    let mut path = format!("/api/queues/{}/jobs", encode(queue_name));
    if let Some(state) = state {
        path.push_str("?state=");
        path.push_str(state.as_str());
    }
    delete(&path).await
}

pub async fn schedulers() -> Result<AllSchedulersGrouped> {
    fetch_json(SCHEDULERS_PATH).await
}

pub async fn remove_scheduler(scheduler_id: &str, queue_name: &str) -> Result<()> {
    delete(&format!(
        "/api/schedulers/{}?queueName={}",
        encode(scheduler_id),
        encode(queue_name)
    ))
    .await
}

pub async fn live_event_config() -> Result<Option<LiveEventConfig>> {
    fetch_json(LIVE_CONFIG_PATH).await
}

pub async fn save_live_event_config(config: &LiveEventConfig) -> Result<LiveEventConfig> {
    post_json(LIVE_CONFIG_PATH, config).await
}

pub async fn delete_live_event_config() -> Result<()> {
    delete(LIVE_CONFIG_PATH).await
}

pub async fn team_stats() -> Result<TeamStatsResponse> {
    fetch_json(TEAM_STATS_PATH).await
}

pub async fn update_team_stats(update: &TeamStatsUpdate) -> Result<()> {
    send_json_no_response("PATCH", TEAM_STATS_PATH, update).await
}

pub async fn submit_contact(submission: &ContactSubmission) -> Result<()> {
    send_json_no_response("POST", "/api/contact", submission).await
}

/// Rendered HTML of a legal document
pub async fn document(slug: &str) -> Result<String> {
    fetch_text(&format!("/docs/{}", encode(slug))).await
}
