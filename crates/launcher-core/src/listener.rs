//! Host-side event listeners.

use std::fmt;

use crate::error::{ListenerError, SubscriberError};
use crate::event::PlayerEvent;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A host-registered consumer of player events.
///
/// Listeners are invoked outside the bridge's lock, so they may call back
/// into the controller (including `teardown`).
pub trait Listener: Send + Sync {
    /// Handles one event.
    ///
    /// # Errors
    ///
    /// Returns `ListenerError` if the listener could not handle the event.
    /// The error is reported; delivery to other listeners continues.
    fn on_event(&self, event: &PlayerEvent) -> Result<(), ListenerError>;
}

impl<F> Listener for F
where
    F: Fn(&PlayerEvent) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_event(&self, event: &PlayerEvent) -> Result<(), ListenerError> {
        self(event)
    }
}

/// Outcome of delivering one event to the subscriber snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delivery {
    /// Listeners that handled the event.
    pub delivered: usize,
    /// Listeners that failed, in registration order.
    pub failures: Vec<SubscriberError>,
}
