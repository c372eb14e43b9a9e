//! Subscriber registry.

use std::sync::Arc;

use launcher_core::listener::{Listener, SubscriptionId};

/// A registered listener together with its subscription.
pub type Subscriber = (SubscriptionId, Arc<dyn Listener>);

/// Listeners in registration order.
#[derive(Default)]
pub struct SubscriberRegistry {
    next_id: u64,
    entries: Vec<Subscriber>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener and returns its subscription.
    pub fn subscribe(&mut self, listener: Arc<dyn Listener>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId::new(self.next_id);
        self.entries.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Copies the current listener set for delivery outside the lock.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Subscriber> {
        self.entries.clone()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
