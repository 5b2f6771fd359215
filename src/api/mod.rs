//! HTTP API handlers
//!
//! Same-origin surface used by the browser console. Every protected `/api`
//! route forwards to the [`AdminBackend`] with the caller's own [`Credential`];
//! status, login, logout and contact are open. The legal documents are served
//! under `/docs`.

pub mod session;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use bettim_dto::live_config::MIN_INTERVAL_SECONDS;
use bettim_dto::{
    AllJobsGrouped, AllSchedulersGrouped, DashboardEvents, Event, JobState, LiveEventConfig,
    LoginRequest, MessageBody, TeamStatsResponse, TeamStatsUpdate,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::adapters::{AdminBackend, BackendError, Credential, FormRelay};
use crate::contact::ContactForm;
use crate::docs::DocumentLibrary;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn AdminBackend>,
    pub relay: FormRelay,
    pub documents: DocumentLibrary,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(backend: Arc<dyn AdminBackend>, relay: FormRelay, documents: DocumentLibrary) -> Self {
        Self {
            backend,
            relay,
            documents,
            started_at: Instant::now(),
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = match &self {
            BackendError::InvalidPassword | BackendError::Unauthorized => StatusCode::UNAUTHORIZED,
            BackendError::Status { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            BackendError::Transport(_) | BackendError::Decode(_) => StatusCode::BAD_GATEWAY,
            BackendError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let expired = matches!(self, BackendError::Unauthorized);
        let message = match self {
            BackendError::InvalidPassword => "Invalid password".to_string(),
            BackendError::Status { message, .. } => message,
            other => other.to_string(),
        };
        let mut response = (status, Json(MessageBody::new(message))).into_response();
        // The remote session is gone; drop the browser's copy too
        if expired {
            response
                .headers_mut()
                .insert(header::SET_COOKIE, session::cleared_cookie());
        }
        response
    }
}

fn unprocessable(message: impl Into<String>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(MessageBody::new(message)),
    )
        .into_response()
}

type ApiResult<T> = Result<T, BackendError>;

/// General status response
#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /api/status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "bettim-admin".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// POST /api/login - Sets the session cookie on success
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    let credential = state.backend.login(&req.password).await?;
    let cookie = session::issue_cookie(&credential)?;
    info!("Admin login succeeded");
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
}

/// POST /api/logout - Clears the session cookie
pub async fn logout_handler() -> Response {
    info!("Admin logout");
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, session::cleared_cookie())],
    )
        .into_response()
}

/// GET /api/events/dashboard
pub async fn dashboard_handler(
    State(state): State<AppState>,
    credential: Credential,
) -> ApiResult<Json<DashboardEvents>> {
    Ok(Json(state.backend.dashboard(&credential).await?))
}

/// POST /api/events - Import an external event
pub async fn create_event_handler(
    State(state): State<AppState>,
    credential: Credential,
    Json(event): Json<Event>,
) -> ApiResult<StatusCode> {
    state.backend.create_event(&credential, &event).await?;
    info!(event_id = %event.id, "Event added");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/events/{id}
pub async fn delete_event_handler(
    State(state): State<AppState>,
    credential: Credential,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.backend.delete_event(&credential, &id).await?;
    info!(event_id = %id, "Event removed");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct QueueParams {
    #[serde(rename = "queueName")]
    pub queue_name: String,
}

#[derive(Deserialize)]
pub struct ClearParams {
    pub state: Option<String>,
}

/// GET /api/jobs
pub async fn jobs_handler(
    State(state): State<AppState>,
    credential: Credential,
) -> ApiResult<Json<AllJobsGrouped>> {
    Ok(Json(state.backend.jobs(&credential).await?))
}

/// DELETE /api/jobs/{id}?queueName=
pub async fn remove_job_handler(
    State(state): State<AppState>,
    credential: Credential,
    Path(id): Path<String>,
    Query(params): Query<QueueParams>,
) -> ApiResult<StatusCode> {
    state.backend.remove_job(&credential, &id, &params.queue_name).await?;
    info!(job_id = %id, queue = %params.queue_name, "Job removed");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/queues/{name}/jobs[?state=]
pub async fn clear_queue_handler(
    State(state): State<AppState>,
    credential: Credential,
    Path(queue): Path<String>,
    Query(params): Query<ClearParams>,
) -> Response {
    let job_state = match params.state.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match JobState::parse(raw) {
            Some(s) => Some(s),
            None => return unprocessable(format!("Unknown job state: {}", raw)),
        },
    };
    match state.backend.clear_queue(&credential, &queue, job_state).await {
        Ok(()) => {
            info!(%queue, state = ?job_state, "Queue cleared");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /api/schedulers
pub async fn schedulers_handler(
    State(state): State<AppState>,
    credential: Credential,
) -> ApiResult<Json<AllSchedulersGrouped>> {
    Ok(Json(state.backend.schedulers(&credential).await?))
}

/// DELETE /api/schedulers/{id}?queueName=
pub async fn remove_scheduler_handler(
    State(state): State<AppState>,
    credential: Credential,
    Path(id): Path<String>,
    Query(params): Query<QueueParams>,
) -> ApiResult<StatusCode> {
    state
        .backend
        .remove_scheduler(&credential, &id, &params.queue_name)
        .await?;
    info!(scheduler_id = %id, queue = %params.queue_name, "Scheduler removed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/live-event/config - `null` when no configuration exists
pub async fn live_config_handler(
    State(state): State<AppState>,
    credential: Credential,
) -> ApiResult<Json<Option<LiveEventConfig>>> {
    Ok(Json(state.backend.live_event_config(&credential).await?))
}

/// POST /api/live-event/config
pub async fn update_live_config_handler(
    State(state): State<AppState>,
    credential: Credential,
    Json(config): Json<LiveEventConfig>,
) -> Response {
    let min_ms = MIN_INTERVAL_SECONDS * 1000;
    if config.regular_interval_ms < min_ms || config.half_time_interval_ms < min_ms {
        return unprocessable(format!(
            "Intervals must be at least {} second",
            MIN_INTERVAL_SECONDS
        ));
    }
    match state.backend.update_live_event_config(&credential, &config).await {
        Ok(saved) => {
            info!(
                regular_ms = saved.regular_interval_ms,
                half_time_ms = saved.half_time_interval_ms,
                "Live event config saved"
            );
            Json(saved).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// DELETE /api/live-event/config
pub async fn delete_live_config_handler(
    State(state): State<AppState>,
    credential: Credential,
) -> ApiResult<StatusCode> {
    state.backend.delete_live_event_config(&credential).await?;
    info!("Live event config deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/team-stats
pub async fn team_stats_handler(
    State(state): State<AppState>,
    credential: Credential,
) -> ApiResult<Json<TeamStatsResponse>> {
    Ok(Json(state.backend.team_stats(&credential).await?))
}

/// PATCH /api/team-stats
pub async fn update_team_stats_handler(
    State(state): State<AppState>,
    credential: Credential,
    Json(update): Json<TeamStatsUpdate>,
) -> ApiResult<StatusCode> {
    state.backend.update_team_stats(&credential, &update).await?;
    info!(team_stats_id = %update.team_stats_id, "Team stats updated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/contact - Validate and hand off to the form relay
pub async fn contact_handler(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Response {
    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(errors) => return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
    };
    match state.relay.submit(&submission).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /docs/{name} (rendered HTML) and /docs/{name}.docx (download)
pub async fn document_handler(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    if let Some(slug) = file.strip_suffix(".docx") {
        return match state.documents.raw(slug).await {
            Some(bytes) => {
                let mime = mime_guess::from_path(&file).first_or_octet_stream();
                (
                    [
                        (header::CONTENT_TYPE, mime.to_string()),
                        (
                            header::CONTENT_DISPOSITION,
                            format!("attachment; filename=\"{}\"", file),
                        ),
                    ],
                    bytes,
                )
                    .into_response()
            }
            None => not_found(&file),
        };
    }

    match state.documents.render(&file).await {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => not_found(&file),
        Err(e) => {
            warn!(document = %file, "Failed to render document: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody::new("Document could not be rendered")),
            )
                .into_response()
        }
    }
}

fn not_found(file: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(MessageBody::new(format!("Document not found: {}", file))),
    )
        .into_response()
}

/// All `/api` and `/docs` routes, state applied
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler))
        .route("/api/events/dashboard", get(dashboard_handler))
        .route("/api/events", post(create_event_handler))
        .route("/api/events/{id}", delete(delete_event_handler))
        .route("/api/jobs", get(jobs_handler))
        .route("/api/jobs/{id}", delete(remove_job_handler))
        .route("/api/queues/{name}/jobs", delete(clear_queue_handler))
        .route("/api/schedulers", get(schedulers_handler))
        .route("/api/schedulers/{id}", delete(remove_scheduler_handler))
        .route(
            "/api/live-event/config",
            get(live_config_handler)
                .post(update_live_config_handler)
                .delete(delete_live_config_handler),
        )
        .route(
            "/api/team-stats",
            get(team_stats_handler).patch(update_team_stats_handler),
        )
        .route("/api/contact", post(contact_handler))
        .route("/docs/{file}", get(document_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::BackendResult;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request};
    use bettim_dto::{JobInfo, QueueJobs, Team, TeamRecord, TeamStats};
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Default)]
    struct FakeBackend {
        events: Mutex<DashboardEvents>,
        jobs: Mutex<AllJobsGrouped>,
        live_config: Mutex<Option<LiveEventConfig>>,
        team_stats: Mutex<Vec<TeamStats>>,
        fail_with: Mutex<Option<BackendError>>,
    }

    /// Cookie header the fake remote API issues on login
    const FAKE_SESSION: &str = "connect.sid=s%3Aletmein; Path=/";

    impl FakeBackend {
        fn check(&self, credential: &Credential) -> BackendResult<()> {
            if credential.as_str() != "connect.sid=s%3Aletmein" {
                return Err(BackendError::Unauthorized);
            }
            match self.fail_with.lock().unwrap().take() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl AdminBackend for FakeBackend {
        async fn login(&self, password: &str) -> BackendResult<Credential> {
            if password == "letmein" {
                Ok(Credential::from_set_cookie([FAKE_SESSION]).unwrap())
            } else {
                Err(BackendError::InvalidPassword)
            }
        }

        async fn dashboard(&self, credential: &Credential) -> BackendResult<DashboardEvents> {
            self.check(credential)?;
            Ok(self.events.lock().unwrap().clone())
        }

        async fn create_event(&self, credential: &Credential, event: &Event) -> BackendResult<()> {
            self.check(credential)?;
            let mut events = self.events.lock().unwrap();
            events.external_events.retain(|e| e.id != event.id);
            let mut stored = event.clone();
            stored.db_id = Some(format!("db-{}", event.id));
            events.db_events.push(stored);
            Ok(())
        }

        async fn delete_event(&self, credential: &Credential, event_id: &str) -> BackendResult<()> {
            self.check(credential)?;
            let mut events = self.events.lock().unwrap();
            let Some(pos) = events.db_events.iter().position(|e| e.id == event_id) else {
                return Err(BackendError::Status {
                    status: 404,
                    message: "Event not found".to_string(),
                });
            };
            let mut event = events.db_events.remove(pos);
            event.db_id = None;
            events.external_events.push(event);
            Ok(())
        }

        async fn jobs(&self, credential: &Credential) -> BackendResult<AllJobsGrouped> {
            self.check(credential)?;
            Ok(self.jobs.lock().unwrap().clone())
        }

        async fn remove_job(
            &self,
            credential: &Credential,
            job_id: &str,
            queue_name: &str,
        ) -> BackendResult<()> {
            self.check(credential)?;
            let mut jobs = self.jobs.lock().unwrap();
            match jobs.get_mut(queue_name).map(|queue| queue.remove(job_id)) {
                Some(true) => Ok(()),
                _ => Err(BackendError::Status {
                    status: 404,
                    message: "Job not found".to_string(),
                }),
            }
        }

        async fn clear_queue(
            &self,
            credential: &Credential,
            queue_name: &str,
            state: Option<JobState>,
        ) -> BackendResult<()> {
            self.check(credential)?;
            if let Some(queue) = self.jobs.lock().unwrap().get_mut(queue_name) {
                queue.clear(state);
            }
            Ok(())
        }

        async fn schedulers(&self, credential: &Credential) -> BackendResult<AllSchedulersGrouped> {
            self.check(credential)?;
            Ok(AllSchedulersGrouped::default())
        }

        async fn remove_scheduler(
            &self,
            credential: &Credential,
            _id: &str,
            _queue: &str,
        ) -> BackendResult<()> {
            self.check(credential)
        }

        async fn live_event_config(
            &self,
            credential: &Credential,
        ) -> BackendResult<Option<LiveEventConfig>> {
            self.check(credential)?;
            Ok(*self.live_config.lock().unwrap())
        }

        async fn update_live_event_config(
            &self,
            credential: &Credential,
            config: &LiveEventConfig,
        ) -> BackendResult<LiveEventConfig> {
            self.check(credential)?;
            *self.live_config.lock().unwrap() = Some(*config);
            Ok(*config)
        }

        async fn delete_live_event_config(&self, credential: &Credential) -> BackendResult<()> {
            self.check(credential)?;
            *self.live_config.lock().unwrap() = None;
            Ok(())
        }

        async fn team_stats(&self, credential: &Credential) -> BackendResult<TeamStatsResponse> {
            self.check(credential)?;
            Ok(TeamStatsResponse {
                success: true,
                league_id: 1,
                data: self.team_stats.lock().unwrap().clone(),
            })
        }

        async fn update_team_stats(
            &self,
            credential: &Credential,
            update: &TeamStatsUpdate,
        ) -> BackendResult<()> {
            self.check(credential)?;
            let mut stats = self.team_stats.lock().unwrap();
            match stats.iter_mut().find(|s| s.id.as_deref() == Some(update.team_stats_id.as_str())) {
                Some(s) => {
                    update.apply_to(s);
                    Ok(())
                }
                None => Err(BackendError::Status {
                    status: 404,
                    message: "Team stats not found".to_string(),
                }),
            }
        }
    }

    fn external_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            kind: "NBA".to_string(),
            start_date: 1_700_000_000_000,
            home_team: Team {
                id: "1".into(),
                name: "Lakers".into(),
                logo_url: String::new(),
            },
            away_team: Team {
                id: "2".into(),
                name: "Celtics".into(),
                logo_url: String::new(),
            },
            ..Default::default()
        }
    }

    fn job(id: &str) -> JobInfo {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "sync-scores",
            "queueName": "live-scores",
            "state": "waiting",
            "data": {},
        }))
        .unwrap()
    }

    fn app_with(backend: Arc<FakeBackend>, relay_url: Option<String>) -> Router {
        router(AppState::new(
            backend,
            FormRelay::new(relay_url, Duration::from_secs(1)),
            DocumentLibrary::default(),
        ))
    }

    fn app(backend: Arc<FakeBackend>) -> Router {
        app_with(backend, None)
    }

    /// `Cookie` header of a browser that logged in
    fn admin_cookie() -> String {
        let credential = Credential::from_set_cookie([FAKE_SESSION]).unwrap();
        let issued = session::issue_cookie(&credential).unwrap();
        issued.to_str().unwrap().split(';').next().unwrap().to_string()
    }

    /// Send as the logged-in admin
    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, Vec<u8>) {
        let cookie = admin_cookie();
        let (status, _, body) = exchange(app, Some(&cookie), method, uri, body).await;
        (status, body)
    }

    async fn exchange(
        app: &Router,
        cookie: Option<&str>,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, HeaderMap, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = app.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    fn set_cookie(headers: &HeaderMap) -> &str {
        headers[header::SET_COOKIE].to_str().unwrap()
    }

    fn json(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let app = app(Arc::new(FakeBackend::default()));
        let (status, body) = send(
            &app,
            "POST",
            "/api/login",
            Some(serde_json::json!({ "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json(&body)["message"], "Invalid password");

        let (status, _) = send(
            &app,
            "POST",
            "/api/login",
            Some(serde_json::json!({ "password": "letmein" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_login_cookie_grants_access_until_logout() {
        let app = app(Arc::new(FakeBackend::default()));
        let login = serde_json::json!({ "password": "letmein" });
        let (status, headers, _) = exchange(&app, None, "POST", "/api/login", Some(login)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let issued = set_cookie(&headers);
        assert!(issued.contains("HttpOnly"));
        assert!(issued.contains("SameSite=Strict"));
        let cookie = issued.split(';').next().unwrap().to_string();
        assert_eq!(cookie, admin_cookie());

        let (status, _, _) = exchange(&app, Some(&cookie), "GET", "/api/events/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, headers, _) = exchange(&app, Some(&cookie), "POST", "/api/logout", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let cleared = set_cookie(&headers);
        assert!(cleared.contains("Max-Age=0"));

        let cleared = cleared.split(';').next().unwrap().to_string();
        let (status, _, _) = exchange(&app, Some(&cleared), "GET", "/api/events/dashboard", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_routes_reject_anonymous_callers() {
        let backend = Arc::new(FakeBackend::default());
        {
            let mut events = backend.events.lock().unwrap();
            let mut stored = external_event("evt-1");
            stored.db_id = Some("db-evt-1".to_string());
            events.db_events.push(stored);
        }
        let app = app(backend.clone());

        // Someone else being logged in must not help
        let (status, _) = send(&app, "GET", "/api/jobs", None).await;
        assert_eq!(status, StatusCode::OK);

        let event = serde_json::to_value(external_event("evt-2")).unwrap();
        let config = serde_json::to_value(LiveEventConfig::from_seconds(10, 45)).unwrap();
        let patch = serde_json::json!({ "teamStatsId": "ts-1", "form": "WWW" });
        let calls = [
            ("GET", "/api/events/dashboard", None),
            ("POST", "/api/events", Some(event)),
            ("DELETE", "/api/events/evt-1", None),
            ("GET", "/api/jobs", None),
            ("DELETE", "/api/jobs/1?queueName=live-scores", None),
            ("DELETE", "/api/queues/live-scores/jobs", None),
            ("GET", "/api/schedulers", None),
            ("DELETE", "/api/schedulers/s-1?queueName=live-scores", None),
            ("GET", "/api/live-event/config", None),
            ("POST", "/api/live-event/config", Some(config)),
            ("DELETE", "/api/live-event/config", None),
            ("GET", "/api/team-stats", None),
            ("PATCH", "/api/team-stats", Some(patch)),
        ];
        for (method, uri, body) in calls {
            let (status, _, body) = exchange(&app, None, method, uri, body).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(json(&body)["message"], "Not authenticated");
        }

        let events = backend.events.lock().unwrap();
        assert_eq!(events.db_events.len(), 1);
        assert!(events.external_events.is_empty());
    }

    #[tokio::test]
    async fn test_event_toggle_moves_groups() {
        let backend = Arc::new(FakeBackend::default());
        backend
            .events
            .lock()
            .unwrap()
            .external_events
            .push(external_event("evt-1"));
        let app = app(backend);

        let event = serde_json::to_value(external_event("evt-1")).unwrap();
        let (status, _) = send(&app, "POST", "/api/events", Some(event)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", "/api/events/dashboard", None).await;
        let events: DashboardEvents = serde_json::from_slice(&body).unwrap();
        assert!(events.external_events.is_empty());
        assert!(events.db_events[0].is_persisted());

        let (status, _) = send(&app, "DELETE", "/api/events/evt-1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", "/api/events/dashboard", None).await;
        let events: DashboardEvents = serde_json::from_slice(&body).unwrap();
        assert!(events.db_events.is_empty());
        assert_eq!(events.external_events[0].id, "evt-1");

        let (status, body) = send(&app, "DELETE", "/api/events/evt-1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body)["message"], "Event not found");
    }

    #[tokio::test]
    async fn test_remove_job_and_clear_queue() {
        let backend = Arc::new(FakeBackend::default());
        {
            let mut jobs = backend.jobs.lock().unwrap();
            let mut queue = QueueJobs::default();
            queue.waiting = vec![job("1"), job("2")];
            jobs.insert("live-scores".to_string(), queue);
        }
        let app = app(backend.clone());

        let (status, _) = send(&app, "DELETE", "/api/jobs/1?queueName=live-scores", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", "/api/jobs", None).await;
        let jobs: AllJobsGrouped = serde_json::from_slice(&body).unwrap();
        assert_eq!(jobs["live-scores"].total(), 1);

        // queueName is required
        let (status, _) = send(&app, "DELETE", "/api/jobs/2", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "DELETE", "/api/queues/live-scores/jobs?state=bogus", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(&body)["message"], "Unknown job state: bogus");

        let (status, _) = send(&app, "DELETE", "/api/queues/live-scores/jobs?state=waiting", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(backend.jobs.lock().unwrap()["live-scores"].total(), 0);
    }

    #[tokio::test]
    async fn test_live_config_lifecycle() {
        let app = app(Arc::new(FakeBackend::default()));

        let (status, body) = send(&app, "GET", "/api/live-event/config", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), serde_json::Value::Null);

        let config = serde_json::to_value(LiveEventConfig::from_seconds(10, 45)).unwrap();
        let (status, body) = send(&app, "POST", "/api/live-event/config", Some(config)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["regularIntervalMs"], 10_000);

        let zero = serde_json::json!({ "regularIntervalMs": 0, "halfTimeIntervalMs": 60000 });
        let (status, _) = send(&app, "POST", "/api/live-event/config", Some(zero)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, "DELETE", "/api/live-event/config", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, "GET", "/api/live-event/config", None).await;
        assert_eq!(json(&body), serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_team_stats_patch() {
        let backend = Arc::new(FakeBackend::default());
        backend.team_stats.lock().unwrap().push(TeamStats {
            id: Some("ts-1".to_string()),
            team_name: "Duke".to_string(),
            record: TeamRecord { wins: 3, losses: 1 },
            ..Default::default()
        });
        let app = app(backend);

        let patch = serde_json::json!({ "teamStatsId": "ts-1", "record": { "wins": 4, "losses": 1 } });
        let (status, _) = send(&app, "PATCH", "/api/team-stats", Some(patch)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", "/api/team-stats", None).await;
        let stats: TeamStatsResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(stats.data[0].record.wins, 4);
        assert_eq!(stats.data[0].team_name, "Duke");
    }

    #[tokio::test]
    async fn test_upstream_errors_are_mapped() {
        let backend = Arc::new(FakeBackend::default());
        let app = app(backend.clone());

        *backend.fail_with.lock().unwrap() = Some(BackendError::Unauthorized);
        let cookie = admin_cookie();
        let (status, headers, _) =
            exchange(&app, Some(&cookie), "GET", "/api/events/dashboard", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(set_cookie(&headers), session::CLEARED_COOKIE);

        *backend.fail_with.lock().unwrap() = Some(BackendError::Transport("timed out".into()));
        let (status, body) = send(&app, "GET", "/api/jobs", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json(&body)["message"].as_str().unwrap().contains("timed out"));

        *backend.fail_with.lock().unwrap() = Some(BackendError::Status {
            status: 500,
            message: "Redis down".into(),
        });
        let (status, body) = send(&app, "GET", "/api/jobs", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["message"], "Redis down");
    }

    #[tokio::test]
    async fn test_contact_validation_and_relay() {
        let app = app(Arc::new(FakeBackend::default()));

        let invalid = serde_json::json!({ "name": "A", "email": "nope", "message": "short" });
        let (status, body) = send(&app, "POST", "/api/contact", Some(invalid)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = json(&body);
        assert!(errors["name"].is_string());
        assert!(errors["email"].is_string());
        assert!(errors["message"].is_string());

        let valid = serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Hello there, Bettim team!"
        });
        let (status, _) = send(&app, "POST", "/api/contact", Some(valid)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_documents() {
        let app = app(Arc::new(FakeBackend::default()));

        let (status, body) = send(&app, "GET", "/docs/privacy", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&body).contains("<h1>Bettim Privacy Policy</h1>"));

        let resp = app
            .clone()
            .oneshot(Request::get("/docs/qa.docx").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );

        let (status, _) = send(&app, "GET", "/docs/cookies", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status() {
        let app = app(Arc::new(FakeBackend::default()));
        let (status, body) = send(&app, "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["service"], "bettim-admin");
    }
}
