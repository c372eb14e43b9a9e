//! The player session aggregate.
//!
//! A `Session` holds everything one launch owns: its lifecycle state, the
//! pending completion handler, and the running player instance. Methods
//! here are pure transitions; callers serialize access.

use launcher_core::clock::Clock;
use launcher_core::error::BridgeError;
use launcher_core::event::EventMetadata;
use launcher_core::player::PlayerInstance;
use uuid::Uuid;

use super::completion::CompletionHandler;
use super::state::SessionState;

/// One launch-to-termination lifetime of the embedded player.
pub struct Session {
    id: Uuid,
    state: SessionState,
    pending_completion: Option<CompletionHandler>,
    instance: Option<Box<dyn PlayerInstance>>,
    last_sequence: u64,
}

impl Session {
    /// Creates a session in `Starting`, holding `handler` as its pending
    /// completion (if any).
    #[must_use]
    pub fn launch(id: Uuid, handler: Option<CompletionHandler>) -> Self {
        Self {
            id,
            state: SessionState::Starting,
            pending_completion: handler,
            instance: None,
            last_sequence: 0,
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a completion handler is waiting.
    #[must_use]
    pub fn has_pending_completion(&self) -> bool {
        self.pending_completion.is_some()
    }

    /// Stores the started player. Hands the instance back if the session
    /// terminated while the player was starting, so the caller can release it.
    ///
    /// # Errors
    ///
    /// Returns the instance unchanged when the session has terminated.
    pub fn attach_instance(
        &mut self,
        instance: Box<dyn PlayerInstance>,
    ) -> Result<(), Box<dyn PlayerInstance>> {
        if self.state == SessionState::Terminated {
            return Err(instance);
        }
        self.instance = Some(instance);
        Ok(())
    }

    /// `Starting → Running`. Returns `true` if the state changed.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::NoActiveSession` once the session is completing
    /// or terminated.
    pub fn acknowledge_start(&mut self) -> Result<bool, BridgeError> {
        match self.state {
            SessionState::Starting => {
                self.state = SessionState::Running;
                Ok(true)
            }
            SessionState::Running => Ok(false),
            SessionState::Idle | SessionState::Completing | SessionState::Terminated => {
                Err(BridgeError::NoActiveSession)
            }
        }
    }

    /// Stamps the next event raised in this session.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::NoActiveSession` if the session no longer
    /// accepts events.
    pub fn next_event_metadata(&mut self, clock: &dyn Clock) -> Result<EventMetadata, BridgeError> {
        if !self.state.accepts_events() {
            return Err(BridgeError::NoActiveSession);
        }
        self.last_sequence += 1;
        Ok(EventMetadata {
            event_id: Uuid::now_v7(),
            session_id: self.id,
            sequence_number: self.last_sequence,
            occurred_at: clock.now(),
        })
    }

    /// Enters `Completing` and takes the pending handler out of the slot.
    ///
    /// A detached session (launched without a handler) still enters
    /// `Completing` and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::NoPendingCompletion` if the session is already
    /// completing or has terminated.
    pub fn begin_completion(&mut self) -> Result<Option<CompletionHandler>, BridgeError> {
        if !self.state.accepts_completion() {
            return Err(BridgeError::NoPendingCompletion);
        }
        self.state = SessionState::Completing;
        Ok(self.pending_completion.take())
    }

    /// `Completing → Terminated`. Returns the player instance to release, or
    /// `None` if a teardown already finished the session.
    pub fn finish_completion(&mut self) -> Option<Box<dyn PlayerInstance>> {
        if self.state != SessionState::Completing {
            return None;
        }
        self.state = SessionState::Terminated;
        self.instance.take()
    }

    /// Forces the session to `Terminated`, discarding the pending handler
    /// without invoking it. Returns the player instance to release.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::SessionTerminated` if the session already ended.
    pub fn teardown(&mut self) -> Result<Option<Box<dyn PlayerInstance>>, BridgeError> {
        if self.state == SessionState::Terminated {
            return Err(BridgeError::SessionTerminated);
        }
        self.state = SessionState::Terminated;
        drop(self.pending_completion.take());
        Ok(self.instance.take())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};
    use launcher_core::options::CompletionResult;
    use launcher_test_support::FixedClock;
    use serde_json::json;

    use super::*;

    struct CountingInstance(Arc<AtomicUsize>);

    impl PlayerInstance for CountingInstance {
        fn release(self: Box<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_handler(calls: &Arc<AtomicUsize>) -> CompletionHandler {
        let calls = Arc::clone(calls);
        CompletionHandler::new(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_begin_completion_takes_handler_exactly_once() {
        // Arrange
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = Session::launch(Uuid::new_v4(), Some(counting_handler(&calls)));

        // Act
        let handler = session.begin_completion().unwrap();
        let second = session.begin_completion();

        // Assert
        assert!(handler.is_some());
        assert!(!session.has_pending_completion());
        assert_eq!(second.unwrap_err(), BridgeError::NoPendingCompletion);
        assert_eq!(session.state(), SessionState::Completing);
    }

    #[test]
    fn test_teardown_discards_handler_without_invoking_it() {
        // Arrange
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = Session::launch(Uuid::new_v4(), Some(counting_handler(&calls)));

        // Act
        let instance = session.teardown().unwrap();

        // Assert
        assert!(instance.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.state(), SessionState::Terminated);
        assert_eq!(
            session.begin_completion().unwrap_err(),
            BridgeError::NoPendingCompletion
        );
    }

    #[test]
    fn test_teardown_twice_is_session_terminated() {
        let mut session = Session::launch(Uuid::new_v4(), None);
        session.teardown().unwrap();

        assert_eq!(
            session.teardown().err(),
            Some(BridgeError::SessionTerminated)
        );
    }

    #[test]
    fn test_finish_completion_after_teardown_releases_nothing() {
        // Arrange
        let releases = Arc::new(AtomicUsize::new(0));
        let mut session = Session::launch(Uuid::new_v4(), None);
        assert!(
            session
                .attach_instance(Box::new(CountingInstance(Arc::clone(&releases))))
                .is_ok()
        );
        session.begin_completion().unwrap();

        // Act
        let from_teardown = session.teardown().unwrap();
        let from_completion = session.finish_completion();

        // Assert
        assert!(from_teardown.is_some());
        assert!(from_completion.is_none());
    }

    #[test]
    fn test_attach_instance_after_termination_hands_it_back() {
        let mut session = Session::launch(Uuid::new_v4(), None);
        session.teardown().unwrap();

        let releases = Arc::new(AtomicUsize::new(0));
        let rejected = session.attach_instance(Box::new(CountingInstance(Arc::clone(&releases))));

        let instance = rejected.err().unwrap();
        instance.release();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_event_metadata_sequence_starts_at_one_and_uses_clock() {
        // Arrange
        let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let clock = FixedClock(fixed_now);
        let id = Uuid::new_v4();
        let mut session = Session::launch(id, None);

        // Act
        let first = session.next_event_metadata(&clock).unwrap();
        let second = session.next_event_metadata(&clock).unwrap();

        // Assert
        assert_eq!(first.sequence_number, 1);
        assert_eq!(second.sequence_number, 2);
        assert_eq!(first.session_id, id);
        assert_eq!(first.occurred_at, fixed_now);
        assert_ne!(first.event_id, second.event_id);
    }

    #[test]
    fn test_acknowledge_start_is_idempotent_while_running() {
        let mut session = Session::launch(Uuid::new_v4(), None);

        assert!(session.acknowledge_start().unwrap());
        assert!(!session.acknowledge_start().unwrap());
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_handler_from_begin_completion_receives_result() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = Session::launch(Uuid::new_v4(), Some(counting_handler(&calls)));

        let handler = session.begin_completion().unwrap().unwrap();
        handler.invoke(CompletionResult::from(json!({ "score": 10 })));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
