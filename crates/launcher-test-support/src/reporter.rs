//! Test reporter — captures absorbed errors for assertions.

use std::sync::Mutex;

use launcher_core::error::BridgeError;
use launcher_core::report::Reporter;

/// A reporter that records every error it is handed.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reported: Mutex<Vec<BridgeError>>,
}

impl RecordingReporter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all reported errors.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn reported(&self) -> Vec<BridgeError> {
        self.reported.lock().unwrap().clone()
    }

    /// Returns the codes of all reported errors, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn codes(&self) -> Vec<&'static str> {
        self.reported
            .lock()
            .unwrap()
            .iter()
            .map(BridgeError::code)
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, error: &BridgeError) {
        self.reported.lock().unwrap().push(error.clone());
    }
}
