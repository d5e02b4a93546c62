//! Time source abstraction.
//!
//! Every tick operation takes an explicit `now`; the gateway resolves the
//! default from a `TimeSource` so tests can pin the clock.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock, backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(fixed: DateTime<Utc>) -> Self {
        Self(fixed)
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
