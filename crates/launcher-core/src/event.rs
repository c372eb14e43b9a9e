//! Player event envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata stamped on every event the bridge delivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Session that raised the event.
    pub session_id: Uuid,
    /// Position within the session, starting at 1.
    pub sequence_number: u64,
    /// When the bridge accepted the event.
    pub occurred_at: DateTime<Utc>,
}

/// A named event raised by the embedded player.
///
/// Names are opaque strings chosen by the player; the bridge never
/// interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event name, e.g. `"progress"`.
    pub name: String,
    /// Event payload.
    pub data: serde_json::Value,
}

impl PlayerEvent {
    /// Returns the event name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the session the event belongs to.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.metadata.session_id
    }
}
