//! Session gate context.
//!
//! Holds the [`SessionStatus`] for the whole app. The stored record is read on
//! the client after mount, so server rendering always sees `Pending`.

use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use std::time::Duration;
use tracing::{info, warn};

use crate::app::{api, timer};
use crate::error::ApiError;
use crate::session::{self, ProtectedCall, SessionStatus, SessionStore};

/// How often an established session is re-checked
pub const REVALIDATE_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[cfg(target_arch = "wasm32")]
fn store() -> Box<dyn SessionStore> {
    Box::new(session::LocalStorageStore)
}

#[cfg(not(target_arch = "wasm32"))]
fn store() -> Box<dyn SessionStore> {
    Box::new(session::MemoryStore::new())
}

#[derive(Clone, Copy, PartialEq)]
pub struct SessionContext {
    pub status: Signal<SessionStatus>,
}

impl SessionContext {
    pub fn is_authenticated(&self) -> bool {
        (self.status)().is_authenticated()
    }

    /// Re-read the stored record (also drops an expired one)
    pub fn restore(&mut self) {
        let status = session::restore(store().as_ref(), session::now_ms());
        self.status.set(status);
    }

    pub fn login(&mut self) {
        let record = session::login(store().as_ref(), session::now_ms());
        info!(expires_at = record.expires_at(), "Session established");
        self.status.set(SessionStatus::Authenticated);
    }

    pub fn logout(&mut self) {
        session::logout(store().as_ref());
        self.end();
    }

    /// End the session if `error` says it is gone; returns whether it did
    pub fn reject(&mut self, error: &ApiError, call: ProtectedCall) -> bool {
        let ended = session::end_on_failure(error, call, store().as_ref());
        if ended {
            self.end();
        }
        ended
    }

    fn end(&mut self) {
        if self.status.peek().is_authenticated() {
            info!("Session ended");
        }
        self.status.set(SessionStatus::Anonymous);
        // The proxy cookie is HttpOnly, only the server can drop it
        let _ = spawn_forever(async {
            if let Err(e) = api::logout().await {
                warn!("Server logout failed: {}", e);
            }
        });
    }

    /// Hit a protected endpoint; any failure ends the session
    pub async fn validate(mut self) {
        if let Err(e) = api::dashboard().await {
            warn!("Session validation failed: {}", e);
            self.reject(&e, ProtectedCall::Validation);
        }
    }
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

/// Install the session context at the app root
pub fn use_session_provider() -> SessionContext {
    let status = use_signal(SessionStatus::default);
    let mut ctx = use_context_provider(|| SessionContext { status });

    // Effects only run on the client
    use_effect(move || ctx.restore());

    use_future(move || async move {
        loop {
            timer::sleep(REVALIDATE_INTERVAL).await;
            if !ctx.status.peek().is_authenticated() {
                continue;
            }
            ctx.restore();
            if ctx.status.peek().is_authenticated() {
                ctx.validate().await;
            }
        }
    });

    ctx
}
