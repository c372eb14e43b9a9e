//! Launcher host — error types.

use launcher_core::error::BridgeError;
use thiserror::Error;

/// Startup and runtime errors for the host runner.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A JSON value could not be parsed or rendered.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The bridge rejected a host call.
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// The session ended without a completion result.
    #[error("player session {0} ended without a result")]
    Aborted(uuid::Uuid),
}
