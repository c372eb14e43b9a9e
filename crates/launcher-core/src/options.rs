//! Launch options and completion results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration handed to the player on launch.
///
/// `scene` and `payload` are the fields every player understands; anything
/// else the player accepts travels in `extra` and is flattened on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchOptions {
    /// Scene or level to open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    /// Input payload for the scene.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
    /// Player-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LaunchOptions {
    /// Options that open `scene` with no payload.
    #[must_use]
    pub fn for_scene(scene: impl Into<String>) -> Self {
        Self {
            scene: Some(scene.into()),
            ..Self::default()
        }
    }

    /// Sets the input payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Adds a player-specific field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// The single result a player reports when it finishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionResult(Value);

impl CompletionResult {
    /// Borrows the underlying value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for CompletionResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
