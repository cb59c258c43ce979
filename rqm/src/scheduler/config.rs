//! Scheduler configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::SchedulerError;

/// Default spacing between two dispatches, matching the MusicBrainz
/// one-request-per-second policy
pub const DEFAULT_RATE_INTERVAL_MS: u64 = 1000;

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minimum milliseconds between the start of two consecutive dispatches
    #[serde(rename = "rate-interval-ms", default = "default_rate_interval_ms")]
    pub rate_interval_ms: u64,
}

fn default_rate_interval_ms() -> u64 {
    DEFAULT_RATE_INTERVAL_MS
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            rate_interval_ms: DEFAULT_RATE_INTERVAL_MS,
        }
    }
}

impl SchedulerConfig {
    /// Build a config from an interval expressed as a Duration
    ///
    /// The interval is kept in whole milliseconds. A sub-millisecond interval
    /// becomes zero and fails [`validate`](Self::validate); an interval too
    /// long for `u64` milliseconds saturates.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            rate_interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Get the rate interval as a Duration
    pub fn rate_interval(&self) -> Duration {
        Duration::from_millis(self.rate_interval_ms)
    }

    /// Reject intervals the scheduler cannot honour
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.rate_interval_ms == 0 {
            return Err(SchedulerError::ZeroInterval);
        }
        Ok(())
    }
}
