//! Reporting sink for errors that must not propagate.

use crate::error::BridgeError;

/// Receives errors the bridge absorbs rather than returns: player misuse and
/// listener failures.
pub trait Reporter: Send + Sync {
    /// Records one absorbed error.
    fn report(&self, error: &BridgeError);
}

/// Reporter that logs through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, error: &BridgeError) {
        tracing::warn!(code = error.code(), error = %error, "player bridge absorbed an error");
    }
}
