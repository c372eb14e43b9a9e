//! The player's side of the bridge.

use std::sync::Weak;

use launcher_core::listener::Delivery;
use launcher_core::options::CompletionResult;
use launcher_core::player::PlayerChannel;
use uuid::Uuid;

use super::controller::Shared;

/// Channel handed to the player on `start`, bound to one session.
///
/// Calls made after the session has ended, or after the controller was
/// dropped, affect nothing. A player that outlives its session cannot reach
/// the next one.
pub struct PlayerLink {
    shared: Weak<Shared>,
    session_id: Uuid,
}

impl PlayerLink {
    pub(crate) fn new(shared: Weak<Shared>, session_id: Uuid) -> Self {
        Self { shared, session_id }
    }
}

impl PlayerChannel for PlayerLink {
    fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn notify_started(&self) {
        match self.shared.upgrade() {
            Some(shared) => shared.notify_started(Some(self.session_id)),
            None => tracing::debug!(session_id = %self.session_id, "start acknowledged after controller dropped"),
        }
    }

    fn emit(&self, name: &str, data: serde_json::Value) -> Delivery {
        match self.shared.upgrade() {
            Some(shared) => shared.emit(Some(self.session_id), name, data),
            None => {
                tracing::debug!(session_id = %self.session_id, name, "event raised after controller dropped");
                Delivery::default()
            }
        }
    }

    fn complete(&self, result: CompletionResult) -> bool {
        match self.shared.upgrade() {
            Some(shared) => shared.complete(Some(self.session_id), result),
            None => {
                tracing::debug!(session_id = %self.session_id, "completion after controller dropped");
                false
            }
        }
    }
}
