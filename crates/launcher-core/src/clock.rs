//! Clock abstraction used to timestamp player events.

use chrono::{DateTime, Utc};

/// Source of event timestamps. Injected so tests can pin `occurred_at`.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
