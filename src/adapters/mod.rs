//! Outbound adapters (Bettim admin API, contact form relay)

pub mod bettim;
pub mod relay;
pub mod traits;

pub use bettim::BettimClient;
pub use relay::FormRelay;
pub use traits::*;
