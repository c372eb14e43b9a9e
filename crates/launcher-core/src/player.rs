//! Ports between the bridge and the embedded player.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::PlayerError;
use crate::listener::Delivery;
use crate::options::{CompletionResult, LaunchOptions};

/// The embedded player, as seen by the bridge.
///
/// `start` must return promptly; the player then runs on its own schedule
/// and talks back through the [`PlayerChannel`] it was given.
pub trait Player: Send + Sync {
    /// Starts a new player run.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError` if the player cannot be started. No session
    /// survives a failed start.
    fn start(
        &self,
        options: &LaunchOptions,
        channel: Arc<dyn PlayerChannel>,
    ) -> Result<Box<dyn PlayerInstance>, PlayerError>;
}

/// Resources held by one running player.
pub trait PlayerInstance: Send {
    /// Releases the player. Called exactly once, on completion or teardown.
    fn release(self: Box<Self>);
}

/// The bridge endpoint handed to a player, scoped to one session.
///
/// None of these calls fail from the player's point of view: misuse is
/// reported on the host side and otherwise ignored.
pub trait PlayerChannel: Send + Sync {
    /// The session this channel belongs to.
    fn session_id(&self) -> Uuid;

    /// Acknowledges that the player is up.
    fn notify_started(&self);

    /// Raises a named event to host subscribers.
    fn emit(&self, name: &str, data: serde_json::Value) -> Delivery;

    /// Reports the final result. Returns `true` if a completion handler ran.
    fn complete(&self, result: CompletionResult) -> bool;
}
