//! Dioxus bindings for the query cache.

use dioxus::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use tracing::warn;

use crate::app::session::{use_session, SessionContext};
use crate::app::{api, timer};
use crate::error::ApiError;
use crate::query::{AdminMutation, QueryCache, QueryKey};
use crate::session::ProtectedCall;

fn query_path(key: QueryKey) -> &'static str {
    match key {
        QueryKey::Dashboard => api::DASHBOARD_PATH,
        QueryKey::Jobs => api::JOBS_PATH,
        QueryKey::Schedulers => api::SCHEDULERS_PATH,
        QueryKey::LiveEventConfig => api::LIVE_CONFIG_PATH,
        QueryKey::TeamStats => api::TEAM_STATS_PATH,
    }
}

/// Cache plus one revision signal per key.
///
/// A resource reads only its own key's signal, so refreshing one key leaves
/// the other queries alone.
#[derive(Clone, Copy)]
pub struct QueryClient {
    cache: CopyValue<QueryCache>,
    revisions: CopyValue<HashMap<QueryKey, Signal<u64>>>,
}

impl QueryClient {
    fn revision(&self, key: QueryKey) -> Option<Signal<u64>> {
        self.revisions.read().get(&key).copied()
    }

    fn subscribe(&self, key: QueryKey) -> u64 {
        self.revision(key).map(|revision| revision()).unwrap_or(0)
    }

    fn bump(self, key: QueryKey) {
        if let Some(mut revision) = self.revision(key) {
            *revision.write() += 1;
        }
    }

    /// Drop `key` and refetch it wherever it is shown
    pub fn refresh(&self, key: QueryKey) {
        self.cache.read().invalidate(key);
        self.bump(key);
    }

    pub fn invalidate_for(&self, mutation: AdminMutation) {
        for key in mutation.invalidates() {
            self.refresh(*key);
        }
    }

    pub fn clear(&self) {
        self.cache.read().clear();
    }

    pub async fn fetch<T: DeserializeOwned>(&self, key: QueryKey) -> Result<T, ApiError> {
        let cache = self.cache.read().clone();
        cache
            .fetch(key, move || api::fetch_json::<Value>(query_path(key)))
            .await
    }
}

pub fn use_query_client() -> QueryClient {
    use_context::<QueryClient>()
}

pub fn use_query_provider() -> QueryClient {
    use_context_provider(|| QueryClient {
        cache: CopyValue::new(QueryCache::new()),
        revisions: CopyValue::new(
            QueryKey::ALL
                .into_iter()
                .map(|key| (key, Signal::new(0)))
                .collect(),
        ),
    })
}

/// Cached GET of `key`; re-runs after invalidation, ends the session on 401/403
pub fn use_query<T>(key: QueryKey) -> Resource<Result<T, ApiError>>
where
    T: DeserializeOwned + 'static,
{
    let client = use_query_client();
    let session = use_session();

    use_resource(move || {
        let mut session = session;
        let _revision = client.subscribe(key);
        async move {
            let result = client.fetch::<T>(key).await;
            if let Err(e) = &result {
                if session.reject(e, ProtectedCall::Request) {
                    warn!(key = key.as_str(), "Query rejected, session ended");
                }
            }
            result
        }
    })
}

/// Refetch `key` on its poll interval while the calling component is mounted
pub fn use_polling(key: QueryKey) {
    let client = use_query_client();
    use_future(move || {
        async move {
            let Some(every) = key.poll_interval() else {
                return;
            };
            loop {
                timer::sleep(every).await;
                client.refresh(key);
            }
        }
    });
}

/// Await a write, then invalidate what it changed.
///
/// Auth failures end the session; other errors are returned to the caller.
pub async fn run_mutation<T, Fut>(
    client: QueryClient,
    mut session: SessionContext,
    mutation: AdminMutation,
    request: Fut,
) -> Result<T, ApiError>
where
    Fut: Future<Output = Result<T, ApiError>>,
{
    match request.await {
        Ok(value) => {
            client.invalidate_for(mutation);
            Ok(value)
        }
        Err(e) => {
            warn!(?mutation, "Mutation failed: {}", e);
            session.reject(&e, ProtectedCall::Request);
            Err(e)
        }
    }
}
