use crate::domain::ports::Clock;
use crate::utils::error::{Result, UmbrellaError};
use chrono::{DateTime, FixedOffset, Local};

/// Wall clock in the host's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Accepts an RFC 3339 timestamp, e.g. `2025-10-10T12:00:00+11:00`.
    pub fn parse(rfc3339: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(rfc3339)
            .map(Self)
            .map_err(|e| UmbrellaError::InvalidConfigValueError {
                field: "now".to_string(),
                value: rfc3339.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
