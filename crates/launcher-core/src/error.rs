//! Bridge error types.

use thiserror::Error;
use uuid::Uuid;

use crate::listener::SubscriptionId;

/// Top-level error type for the player bridge.
///
/// Host misuse (`AlreadyActive`, `SessionTerminated`, `PlayerStart`) is
/// returned to the caller. Player misbehaviour (`NoActiveSession`,
/// `NoPendingCompletion`) and listener failures (`Subscriber`) are handed to
/// a [`Reporter`](crate::report::Reporter) instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    /// `launch` was called while a session is still active.
    #[error("a player session is already active: {0}")]
    AlreadyActive(Uuid),

    /// The player called into the bridge with no session to receive it.
    #[error("no active player session")]
    NoActiveSession,

    /// `complete` arrived with no completion handler waiting for it.
    #[error("no pending completion handler")]
    NoPendingCompletion,

    /// The operation is not valid once the session has terminated.
    #[error("player session has terminated")]
    SessionTerminated,

    /// A listener failed while handling an event.
    #[error(transparent)]
    Subscriber(#[from] SubscriberError),

    /// The player refused to start.
    #[error("player failed to start: {0}")]
    PlayerStart(#[from] PlayerError),
}

impl BridgeError {
    /// Machine-readable error code, stable across releases.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyActive(_) => "already_active",
            Self::NoActiveSession => "no_active_session",
            Self::NoPendingCompletion => "no_pending_completion",
            Self::SessionTerminated => "session_terminated",
            Self::Subscriber(_) => "subscriber_error",
            Self::PlayerStart(_) => "player_start_failed",
        }
    }
}

/// A single listener's failure to handle one event.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("subscriber {subscription_id} failed on event `{event_name}`: {source}")]
pub struct SubscriberError {
    /// The failing subscription.
    pub subscription_id: SubscriptionId,
    /// Name of the event being delivered.
    pub event_name: String,
    /// What the listener reported.
    #[source]
    pub source: ListenerError,
}

/// Failure raised by a listener.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListenerError {
    /// The listener returned an error.
    #[error("listener rejected event: {0}")]
    Rejected(String),

    /// The listener panicked.
    #[error("listener panicked: {0}")]
    Panicked(String),
}

/// Failure raised by the embedded player when asked to start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    /// The player runtime could not be brought up.
    #[error("player unavailable: {0}")]
    Unavailable(String),

    /// The player did not understand the launch options.
    #[error("invalid launch options: {0}")]
    InvalidOptions(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_per_variant() {
        let errors = [
            BridgeError::AlreadyActive(Uuid::nil()),
            BridgeError::NoActiveSession,
            BridgeError::NoPendingCompletion,
            BridgeError::SessionTerminated,
            BridgeError::Subscriber(SubscriberError {
                subscription_id: SubscriptionId::new(1),
                event_name: "progress".to_owned(),
                source: ListenerError::Rejected("nope".into()),
            }),
            BridgeError::PlayerStart(PlayerError::Unavailable("gone".into())),
        ];

        let mut codes: Vec<&str> = errors.iter().map(BridgeError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_subscriber_error_message_names_subscription_and_event() {
        let err = BridgeError::from(SubscriberError {
            subscription_id: SubscriptionId::new(7),
            event_name: "progress".to_owned(),
            source: ListenerError::Panicked("boom".into()),
        });

        assert_eq!(
            err.to_string(),
            "subscriber #7 failed on event `progress`: listener panicked: boom"
        );
    }
}
