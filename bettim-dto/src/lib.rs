//! Wire types for the Bettim admin API.
//!
//! This crate defines the types that cross boundaries between:
//! - the Bettim admin REST API (the remote source of truth)
//! - the admin console server, which forwards `/api` calls to it
//! - the admin console browser client
//!
//! # Modules
//! - [`envelope`] - `{ success, message, data }` response wrapper
//! - [`event`] - Sports events and the admin dashboard groups
//! - [`jobs`] - Queue jobs and recurring schedulers
//! - [`live_config`] - Live-event polling intervals and seconds/ms conversion
//! - [`team_stats`] - NCAA team statistics and partial updates

pub mod envelope;
pub mod event;
pub mod jobs;
pub mod live_config;
pub mod team_stats;

// Re-export commonly used types at crate root
pub use envelope::{ApiEnvelope, LoginRequest, MessageBody};
pub use event::{DashboardEvents, Event, EventAction, Team};
pub use jobs::{
    AllJobsGrouped, AllSchedulersGrouped, JobInfo, JobState, JobsSummary, QueueJobs,
    SchedulerInfo, Timestamp,
};
pub use live_config::LiveEventConfig;
pub use team_stats::{TeamRecord, TeamStats, TeamStatsResponse, TeamStatsUpdate};
