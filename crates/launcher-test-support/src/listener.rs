//! Test listeners.

use std::sync::Mutex;

use launcher_core::error::ListenerError;
use launcher_core::event::PlayerEvent;
use launcher_core::listener::Listener;

/// A listener that records every event it receives.
#[derive(Debug, Default)]
pub struct RecordingListener {
    received: Mutex<Vec<PlayerEvent>>,
}

impl RecordingListener {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all received events.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn events(&self) -> Vec<PlayerEvent> {
        self.received.lock().unwrap().clone()
    }

    /// Returns the names of all received events, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn names(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|event| event.name.clone())
            .collect()
    }
}

impl Listener for RecordingListener {
    fn on_event(&self, event: &PlayerEvent) -> Result<(), ListenerError> {
        self.received.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A listener that rejects every event.
#[derive(Debug)]
pub struct FailingListener;

impl Listener for FailingListener {
    fn on_event(&self, _event: &PlayerEvent) -> Result<(), ListenerError> {
        Err(ListenerError::Rejected("listener offline".into()))
    }
}

/// A listener that panics on every event.
#[derive(Debug)]
pub struct PanickingListener;

impl Listener for PanickingListener {
    fn on_event(&self, event: &PlayerEvent) -> Result<(), ListenerError> {
        panic!("listener blew up on {}", event.name);
    }
}
