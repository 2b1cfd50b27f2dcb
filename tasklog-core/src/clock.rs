//! Server timestamps.
//!
//! The clock is injected so tests can pin the time that ends up in the
//! `timestamp` column.

use chrono::{DateTime, Utc};

/// ISO-8601 UTC with second precision and an explicit `Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time rendered with [`TIMESTAMP_FORMAT`].
    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

/// Production clock using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).single();
        let Some(at) = at else {
            panic!("valid date");
        };
        assert_eq!(FixedClock(at).timestamp(), "2024-03-09T07:05:01Z");
    }

    #[test]
    fn test_system_clock_drops_subseconds() {
        let ts = SystemClock.timestamp();
        assert_eq!(ts.len(), "2024-03-09T07:05:01Z".len());
        assert!(ts.ends_with('Z'));
        assert!(!ts.contains('.'));
    }
}
