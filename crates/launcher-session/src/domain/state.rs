//! Session lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of one player session:
/// `Idle → Starting → Running → Completing → Terminated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session has been launched (or the last one was reset).
    #[default]
    Idle,
    /// The player has been asked to start.
    Starting,
    /// The player acknowledged start.
    Running,
    /// The completion handler is being invoked.
    Completing,
    /// The session ended by completion or teardown.
    Terminated,
}

impl SessionState {
    /// A session exists and has not terminated. Blocks a new `launch`.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Starting | Self::Running | Self::Completing)
    }

    /// The player may still `complete` in this state.
    #[must_use]
    pub fn accepts_completion(self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }

    /// Events raised in this state are delivered.
    #[must_use]
    pub fn accepts_events(self) -> bool {
        self.is_active()
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Completing => "completing",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
