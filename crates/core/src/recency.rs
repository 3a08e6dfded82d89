//! Recency index math.
//!
//! The time-scored index stores each post under its expiry instant in epoch
//! seconds. An entry whose score is less than or equal to "now" is expired.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lifetime of an entry in the time-scored index (12 hours).
pub const DEFAULT_RECENT_WINDOW: Duration = Duration::from_secs(12 * 60 * 60);

/// Default capacity of the fixed-length index.
pub const DEFAULT_RECENT_LIST_SIZE: usize = 100;

/// Returns `now + duration` as epoch seconds.
pub fn calculate_expire_time(now: DateTime<Utc>, duration: Duration) -> i64 {
    now.timestamp()
        .saturating_add(i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
}

/// How the recency index is maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecencyStrategy {
    /// Sorted set scored by expiry; expired entries are excised on every access.
    #[default]
    TimeScored,
    /// List of the N most recent posts, kept by push + trim, no expiry.
    FixedList,
}

impl RecencyStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeScored => "time-scored",
            Self::FixedList => "fixed-list",
        }
    }
}

impl std::fmt::Display for RecencyStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown recency strategy: {0}")]
pub struct UnknownStrategy(String);

impl FromStr for RecencyStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time-scored" | "time_scored" | "scored" => Ok(Self::TimeScored),
            "fixed-list" | "fixed_list" | "list" => Ok(Self::FixedList),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}
