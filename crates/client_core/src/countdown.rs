use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Calendar-agnostic breakdown of the time left until a target instant.
///
/// `hours < 24`, `minutes < 60` and `seconds < 60` always hold; `days` is
/// unbounded. Once the target has passed every component is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeRemaining {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeRemaining {
    pub const ZERO: TimeRemaining = TimeRemaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Breaks a millisecond delta down; non-positive deltas clamp to zero.
    pub fn from_millis(delta_ms: i64) -> Self {
        if delta_ms <= 0 {
            return Self::ZERO;
        }

        Self {
            days: (delta_ms / MS_PER_DAY) as u64,
            hours: ((delta_ms / MS_PER_HOUR) % 24) as u32,
            minutes: ((delta_ms / MS_PER_MINUTE) % 60) as u32,
            seconds: ((delta_ms / MS_PER_SECOND) % 60) as u32,
        }
    }

    pub fn is_elapsed(&self) -> bool {
        *self == Self::ZERO
    }

    /// Whole milliseconds represented by the breakdown (sub-second remainder dropped).
    pub fn as_millis(&self) -> i64 {
        self.days as i64 * MS_PER_DAY
            + i64::from(self.hours) * MS_PER_HOUR
            + i64::from(self.minutes) * MS_PER_MINUTE
            + i64::from(self.seconds) * MS_PER_SECOND
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}d {:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Time left from `now` until `target`; zero once `now >= target`.
pub fn time_remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    if now >= target {
        return TimeRemaining::ZERO;
    }
    TimeRemaining::from_millis((target - now).num_milliseconds())
}

#[cfg(test)]
#[path = "tests/countdown_tests.rs"]
mod tests;
