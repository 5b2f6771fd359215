//! Client-side admin session.
//!
//! The session is a flag plus a creation timestamp persisted in browser
//! storage. It is the only entity whose lifecycle the console owns: created on
//! login, dropped on logout, after 24 hours, or when the server rejects it.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use crate::error::ApiError;

/// Storage key holding the session record
pub const SESSION_STORAGE_KEY: &str = "bettim-admin-auth";

/// Session lifetime: 24 hours in milliseconds
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Persisted session record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    pub authenticated: bool,
    /// Creation time, milliseconds since epoch
    pub timestamp: i64,
}

impl SessionRecord {
    pub fn new(now_ms: i64) -> Self {
        Self {
            authenticated: true,
            timestamp: now_ms,
        }
    }

    /// Valid iff authenticated and younger than [`SESSION_TTL_MS`]
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        self.authenticated && now_ms.saturating_sub(self.timestamp) < SESSION_TTL_MS
    }

    pub fn expires_at(&self) -> i64 {
        self.timestamp.saturating_add(SESSION_TTL_MS)
    }
}

/// Gate state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// Storage has not been read yet (server rendering, first client frame)
    #[default]
    Pending,
    Authenticated,
    Anonymous,
}

impl SessionStatus {
    pub fn is_authenticated(self) -> bool {
        self == SessionStatus::Authenticated
    }
}

/// Raw key/value persistence for the session record
pub trait SessionStore {
    fn load(&self) -> Option<String>;
    fn save(&self, raw: &str);
    fn clear(&self);
}

/// Read the stored record and decide the gate state.
///
/// Unparseable, unauthenticated, or expired records are removed.
pub fn restore(store: &dyn SessionStore, now_ms: i64) -> SessionStatus {
    let Some(raw) = store.load() else {
        return SessionStatus::Anonymous;
    };

    match serde_json::from_str::<SessionRecord>(&raw) {
        Ok(record) if record.is_valid_at(now_ms) => SessionStatus::Authenticated,
        Ok(record) => {
            debug!(timestamp = record.timestamp, "Stored session expired");
            store.clear();
            SessionStatus::Anonymous
        }
        Err(e) => {
            debug!("Discarding malformed session record: {}", e);
            store.clear();
            SessionStatus::Anonymous
        }
    }
}

/// Persist a fresh session record after a successful login
pub fn login(store: &dyn SessionStore, now_ms: i64) -> SessionRecord {
    let record = SessionRecord::new(now_ms);
    match serde_json::to_string(&record) {
        Ok(raw) => store.save(&raw),
        Err(e) => debug!("Failed to encode session record: {}", e),
    }
    record
}

pub fn logout(store: &dyn SessionStore) {
    store.clear();
}

/// What kind of protected call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedCall {
    /// Periodic session check: any failure ends the session
    Validation,
    /// Query or mutation: only 401/403 end the session
    Request,
}

/// Clear the stored record when `error` means the session is no longer usable.
///
/// Returns whether the session was ended.
pub fn end_on_failure(error: &ApiError, call: ProtectedCall, store: &dyn SessionStore) -> bool {
    let ends = match call {
        ProtectedCall::Validation => true,
        ProtectedCall::Request => error.is_auth_failure(),
    };
    if ends {
        debug!(?call, "Ending session after failure: {}", error);
        logout(store);
    }
    ends
}

/// Current wall-clock time in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Process-local store used during server rendering and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(raw: &str) -> Self {
        Self {
            value: Rc::new(RefCell::new(Some(raw.to_string()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.value.borrow().clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    fn save(&self, raw: &str) {
        *self.value.borrow_mut() = Some(raw.to_string());
    }

    fn clear(&self) {
        *self.value.borrow_mut() = None;
    }
}

/// Browser `localStorage` backed store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for LocalStorageStore {
    fn load(&self) -> Option<String> {
        Self::storage()?.get_item(SESSION_STORAGE_KEY).ok().flatten()
    }

    fn save(&self, raw: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(SESSION_STORAGE_KEY, raw);
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(SESSION_STORAGE_KEY);
        }
    }
}
