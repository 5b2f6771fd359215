//! Live-event polling configuration.
//!
//! Intervals are edited in whole seconds and stored in milliseconds. Fractional
//! seconds are not representable; `seconds_to_ms` rounds before scaling.

use serde::{Deserialize, Serialize};

/// Default interval for regular game play (Q1-Q4, BT, NS)
pub const DEFAULT_REGULAR_INTERVAL_MS: u64 = 15_000;
/// Default interval during half time
pub const DEFAULT_HALF_TIME_INTERVAL_MS: u64 = 60_000;
/// Smallest interval the editor accepts, in seconds
pub const MIN_INTERVAL_SECONDS: u64 = 1;

/// Singleton live-event configuration record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LiveEventConfig {
    pub regular_interval_ms: u64,
    pub half_time_interval_ms: u64,
}

impl Default for LiveEventConfig {
    fn default() -> Self {
        Self {
            regular_interval_ms: DEFAULT_REGULAR_INTERVAL_MS,
            half_time_interval_ms: DEFAULT_HALF_TIME_INTERVAL_MS,
        }
    }
}

impl LiveEventConfig {
    pub fn from_seconds(regular: u64, half_time: u64) -> Self {
        Self {
            regular_interval_ms: seconds_to_ms(regular as f64),
            half_time_interval_ms: seconds_to_ms(half_time as f64),
        }
    }

    pub fn regular_seconds(&self) -> u64 {
        ms_to_seconds(self.regular_interval_ms)
    }

    pub fn half_time_seconds(&self) -> u64 {
        ms_to_seconds(self.half_time_interval_ms)
    }
}

/// `round(seconds) * 1000`, negative input clamps to zero
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds.round() as u64).saturating_mul(1000)
}

/// `round(ms / 1000)`, halves round up
pub fn ms_to_seconds(ms: u64) -> u64 {
    ms / 1000 + u64::from(ms % 1000 >= 500)
}

/// Parse an interval field the way a number input reports it: the leading
/// integer part is taken, anything unparseable becomes 0.
pub fn parse_seconds_input(input: &str) -> u64 {
    let digits: String = input
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
