//! Dioxus fullstack page components.

mod dashboard;
mod jobs;
mod landing;
mod legal;
mod live_config;
mod login;
mod team_stats;

pub use dashboard::Dashboard;
pub use jobs::Jobs;
pub use landing::Landing;
pub use legal::{NotFound, Privacy, Qa, Terms};
pub use live_config::{parse_intervals, IntervalErrors, LiveConfig};
pub use login::{login_error_message, Login};
pub use team_stats::{EditDraft, TeamStats};
