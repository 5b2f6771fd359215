//! Client-side query cache.
//!
//! Results of the console's GET calls are cached per logical key. Concurrent
//! fetches of one key share a single request, errors are never cached, and a
//! mutation invalidates the keys whose data it changed. The cache is never a
//! source of truth: dropping it only costs a refetch.

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

use crate::error::ApiError;

/// Interval at which the job and scheduler views refetch while mounted
pub const POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Logical name of a cached query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Dashboard,
    Jobs,
    Schedulers,
    LiveEventConfig,
    TeamStats,
}

impl QueryKey {
    pub const ALL: [QueryKey; 5] = [
        QueryKey::Dashboard,
        QueryKey::Jobs,
        QueryKey::Schedulers,
        QueryKey::LiveEventConfig,
        QueryKey::TeamStats,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QueryKey::Dashboard => "dashboard",
            QueryKey::Jobs => "bullmq-jobs",
            QueryKey::Schedulers => "bullmq-schedulers",
            QueryKey::LiveEventConfig => "live-event-config",
            QueryKey::TeamStats => "ncaa-team-stats",
        }
    }

    /// How long a cached result is served without refetching
    pub fn stale_time(self) -> Duration {
        match self {
            QueryKey::Jobs | QueryKey::Schedulers => Duration::from_secs(10),
            QueryKey::LiveEventConfig => Duration::from_secs(30),
            QueryKey::Dashboard | QueryKey::TeamStats => Duration::ZERO,
        }
    }

    /// Background refetch interval while a view shows this query
    pub fn poll_interval(self) -> Option<Duration> {
        match self {
            QueryKey::Jobs | QueryKey::Schedulers => Some(POLL_INTERVAL),
            _ => None,
        }
    }
}

/// Every write the console can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminMutation {
    CreateEvent,
    DeleteEvent,
    RemoveJob,
    ClearQueue,
    RemoveScheduler,
    UpdateLiveEventConfig,
    DeleteLiveEventConfig,
    UpdateTeamStats,
}

impl AdminMutation {
    /// Cached queries made stale by a successful mutation
    pub fn invalidates(self) -> &'static [QueryKey] {
        match self {
            AdminMutation::CreateEvent | AdminMutation::DeleteEvent => &[QueryKey::Dashboard],
            AdminMutation::RemoveJob | AdminMutation::ClearQueue => &[QueryKey::Jobs],
            AdminMutation::RemoveScheduler => &[QueryKey::Schedulers],
            AdminMutation::UpdateLiveEventConfig | AdminMutation::DeleteLiveEventConfig => {
                &[QueryKey::LiveEventConfig]
            }
            AdminMutation::UpdateTeamStats => &[QueryKey::TeamStats],
        }
    }
}

type SharedFetch = Shared<LocalBoxFuture<'static, Result<Value, ApiError>>>;

enum Slot {
    InFlight {
        generation: u64,
        fetch: SharedFetch,
    },
    Ready {
        value: Value,
        fetched_at: i64,
    },
}

enum Plan {
    Cached(Value),
    Join(SharedFetch),
    Fetch,
}

#[derive(Default)]
struct CacheInner {
    slots: HashMap<QueryKey, Slot>,
    generations: HashMap<QueryKey, u64>,
}

impl CacheInner {
    fn generation(&self, key: QueryKey) -> u64 {
        self.generations.get(&key).copied().unwrap_or(0)
    }
}

/// Shared handle to the cache; clones see the same entries.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Rc<RefCell<CacheInner>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `key`, serving a fresh cached value or joining an in-flight request.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>> + 'static,
    {
        self.fetch_at(key, crate::session::now_ms(), fetcher).await
    }

    /// [`fetch`](Self::fetch) with an explicit clock reading
    pub async fn fetch_at<T, F, Fut>(
        &self,
        key: QueryKey,
        now_ms: i64,
        fetcher: F,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>> + 'static,
    {
        let (generation, fetch) = {
            let mut inner = self.inner.borrow_mut();
            let generation = inner.generation(key);
            let stale_ms = key.stale_time().as_millis() as i64;

            let plan = match inner.slots.get(&key) {
                Some(Slot::Ready { value, fetched_at })
                    if stale_ms > 0 && now_ms.saturating_sub(*fetched_at) < stale_ms =>
                {
                    Plan::Cached(value.clone())
                }
                Some(Slot::InFlight {
                    generation: g,
                    fetch,
                }) if *g == generation => Plan::Join(fetch.clone()),
                _ => Plan::Fetch,
            };

            match plan {
                Plan::Cached(value) => {
                    debug!(key = key.as_str(), "Query served from cache");
                    return decode(value);
                }
                Plan::Join(fetch) => {
                    debug!(key = key.as_str(), "Joining in-flight query");
                    (generation, fetch)
                }
                Plan::Fetch => {
                    debug!(key = key.as_str(), "Query fetching");
                    let fetch = fetcher().boxed_local().shared();
                    inner.slots.insert(
                        key,
                        Slot::InFlight {
                            generation,
                            fetch: fetch.clone(),
                        },
                    );
                    (generation, fetch)
                }
            }
        };

        let result = fetch.await;

        {
            let mut inner = self.inner.borrow_mut();
            let still_current = inner.generation(key) == generation
                && matches!(
                    inner.slots.get(&key),
                    Some(Slot::InFlight { generation: g, .. }) if *g == generation
                );
            if still_current {
                match &result {
                    Ok(value) => {
                        inner.slots.insert(
                            key,
                            Slot::Ready {
                                value: value.clone(),
                                fetched_at: now_ms,
                            },
                        );
                    }
                    Err(_) => {
                        inner.slots.remove(&key);
                    }
                }
            }
        }

        decode(result?)
    }

    /// Drop the cached result for `key`; in-flight requests will not repopulate it.
    pub fn invalidate(&self, key: QueryKey) {
        let mut inner = self.inner.borrow_mut();
        inner.slots.remove(&key);
        *inner.generations.entry(key).or_insert(0) += 1;
        debug!(key = key.as_str(), "Query invalidated");
    }

    /// Invalidate every key affected by `mutation`
    pub fn invalidate_for(&self, mutation: AdminMutation) {
        for key in mutation.invalidates() {
            self.invalidate(*key);
        }
    }

    pub fn generation(&self, key: QueryKey) -> u64 {
        self.inner.borrow().generation(key)
    }

    pub fn is_cached(&self, key: QueryKey) -> bool {
        matches!(self.inner.borrow().slots.get(&key), Some(Slot::Ready { .. }))
    }

    /// Forget everything (logout)
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        let keys: Vec<QueryKey> = inner.slots.keys().copied().collect();
        inner.slots.clear();
        for key in keys {
            *inner.generations.entry(key).or_insert(0) += 1;
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
