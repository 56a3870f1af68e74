//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Value object bounding a recording in time.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.as_secs();
        let (minutes, seconds) = (total / 60, total % 60);
        match (minutes, seconds) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string. Supported formats: "30s", "1m", "2m30s".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DurationParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_lowercase();

        let (minute_part, second_part) = match input.split_once('m') {
            Some((m, rest)) => (Some(m), rest),
            None => (None, input.as_str()),
        };

        let minutes: u64 = match minute_part {
            Some(digits) => digits.parse().map_err(|_| err())?,
            None => 0,
        };

        let seconds: u64 = match second_part.strip_suffix('s') {
            Some(digits) => digits.parse().map_err(|_| err())?,
            None if second_part.is_empty() && minute_part.is_some() => 0,
            None => return Err(err()),
        };

        let total_ms = (minutes * 60 + seconds) * 1000;
        if total_ms == 0 {
            return Err(err());
        }

        Ok(Self::from_millis(total_ms))
    }
}
