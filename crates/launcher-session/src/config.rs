//! Controller configuration.

use serde::{Deserialize, Serialize};

/// How a session moves from `Starting` to `Running`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartAcknowledgement {
    /// Wait for the player to call `notify_started`.
    #[default]
    Explicit,
    /// Enter `Running` as soon as the player's `start` returns.
    Implicit,
}

/// Settings for a [`BridgeController`](crate::BridgeController).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Start acknowledgement mode.
    #[serde(default)]
    pub start_acknowledgement: StartAcknowledgement,
}

impl ControllerConfig {
    /// Config for players that never acknowledge start.
    #[must_use]
    pub fn implicit_start() -> Self {
        Self {
            start_acknowledgement: StartAcknowledgement::Implicit,
        }
    }
}
