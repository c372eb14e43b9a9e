//! Shared test mocks and utilities for the launcher bridge.

mod clock;
mod listener;
mod player;
mod reporter;

pub use clock::FixedClock;
pub use listener::{FailingListener, PanickingListener, RecordingListener};
pub use player::{RefusingPlayer, ScriptedPlayer};
pub use reporter::RecordingReporter;
