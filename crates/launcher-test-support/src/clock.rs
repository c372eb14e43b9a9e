//! Test clock — pins event timestamps.

use chrono::{DateTime, Utc};
use launcher_core::clock::Clock;

/// A clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
