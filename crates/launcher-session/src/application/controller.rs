//! The bridge controller.
//!
//! The host drives the controller (`launch`, `subscribe`, `teardown`); the
//! player drives it back through a [`PlayerLink`]. Every mutation of the
//! session happens under one lock. Listeners, completion handlers and the
//! player itself are always called with the lock released, so any of them
//! may re-enter the controller.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use launcher_core::clock::{Clock, SystemClock};
use launcher_core::error::{BridgeError, ListenerError, SubscriberError};
use launcher_core::event::PlayerEvent;
use launcher_core::listener::{Delivery, Listener, SubscriptionId};
use launcher_core::options::{CompletionResult, LaunchOptions};
use launcher_core::player::{Player, PlayerInstance};
use launcher_core::report::{Reporter, TracingReporter};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

use crate::application::link::PlayerLink;
use crate::config::{ControllerConfig, StartAcknowledgement};
use crate::domain::completion::CompletionHandler;
use crate::domain::registry::SubscriberRegistry;
use crate::domain::session::Session;
use crate::domain::state::SessionState;

/// Point-in-time view of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current state.
    pub state: SessionState,
    /// Current or most recent session, if any.
    pub session_id: Option<Uuid>,
    /// Whether a completion handler is waiting.
    pub completion_pending: bool,
    /// Registered listeners.
    pub subscriber_count: usize,
}

struct Inner {
    session: Option<Session>,
    registry: SubscriberRegistry,
}

impl Inner {
    fn state(&self) -> SessionState {
        self.session.as_ref().map_or(SessionState::Idle, Session::state)
    }
}

pub(crate) struct Shared {
    inner: Mutex<Inner>,
    player: Arc<dyn Player>,
    clock: Arc<dyn Clock>,
    reporter: Arc<dyn Reporter>,
    config: ControllerConfig,
    state_tx: watch::Sender<SessionState>,
}

/// Mediates between the host and one embedded player at a time.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct BridgeController {
    shared: Arc<Shared>,
}

impl BridgeController {
    /// Creates a controller with the system clock and a `tracing` reporter.
    #[must_use]
    pub fn new(player: Arc<dyn Player>, config: ControllerConfig) -> Self {
        Self::with_parts(
            player,
            config,
            Arc::new(SystemClock),
            Arc::new(TracingReporter),
        )
    }

    /// Creates a controller with an explicit clock and reporter.
    #[must_use]
    pub fn with_parts(
        player: Arc<dyn Player>,
        config: ControllerConfig,
        clock: Arc<dyn Clock>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    session: None,
                    registry: SubscriberRegistry::new(),
                }),
                player,
                clock,
                reporter,
                config,
                state_tx,
            }),
        }
    }

    /// Launches the player. `on_complete` runs once, when the player
    /// completes; it never runs if the session is torn down.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::AlreadyActive` if a session is active, or
    /// `BridgeError::PlayerStart` if the player refused to start.
    pub fn launch<F>(&self, options: &LaunchOptions, on_complete: F) -> Result<Uuid, BridgeError>
    where
        F: FnOnce(CompletionResult) + Send + 'static,
    {
        self.start_session(options, Some(CompletionHandler::new(on_complete)))
    }

    /// Launches the player without a completion handler.
    ///
    /// # Errors
    ///
    /// Same as [`launch`](Self::launch).
    pub fn launch_detached(&self, options: &LaunchOptions) -> Result<Uuid, BridgeError> {
        self.start_session(options, None)
    }

    /// Launches the player and returns a receiver for its result. The
    /// receiver errors if the session is torn down instead.
    ///
    /// # Errors
    ///
    /// Same as [`launch`](Self::launch).
    pub fn launch_awaitable(
        &self,
        options: &LaunchOptions,
    ) -> Result<(Uuid, oneshot::Receiver<CompletionResult>), BridgeError> {
        let (handler, rx) = CompletionHandler::channel();
        let session_id = self.start_session(options, Some(handler))?;
        Ok((session_id, rx))
    }

    /// Forcibly ends the session without invoking its completion handler.
    /// A no-op while idle.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::SessionTerminated` if the session already ended.
    pub fn teardown(&self) -> Result<(), BridgeError> {
        let (session_id, instance) = {
            let mut inner = self.shared.inner.lock();
            let Some(session) = inner.session.as_mut() else {
                tracing::debug!("teardown requested with no session");
                return Ok(());
            };
            let instance = session.teardown()?;
            let session_id = session.id();
            self.shared.publish(SessionState::Terminated);
            (session_id, instance)
        };

        if let Some(instance) = instance {
            instance.release();
        }
        tracing::info!(%session_id, "player session torn down");
        Ok(())
    }

    /// Returns a terminated controller to `Idle`. A no-op while idle.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::AlreadyActive` if a session is still active.
    pub fn reset(&self) -> Result<(), BridgeError> {
        let mut inner = self.shared.inner.lock();
        if let Some(session) = inner.session.as_ref().filter(|s| s.state().is_active()) {
            return Err(BridgeError::AlreadyActive(session.id()));
        }
        if inner.session.take().is_some() {
            self.shared.publish(SessionState::Idle);
        }
        Ok(())
    }

    /// Registers a listener. Valid in every state; events raised before this
    /// call are not replayed.
    pub fn subscribe(&self, listener: Arc<dyn Listener>) -> SubscriptionId {
        let id = self.shared.inner.lock().registry.subscribe(listener);
        tracing::debug!(subscription = %id, "listener subscribed");
        id
    }

    /// Registers a listener that forwards every event into a channel.
    pub fn subscribe_channel(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<PlayerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let listener = move |event: &PlayerEvent| {
            tx.send(event.clone())
                .map_err(|_| ListenerError::Rejected("event receiver closed".to_owned()))
        };
        (self.subscribe(Arc::new(listener)), rx)
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.shared.inner.lock().registry.unsubscribe(id);
        tracing::debug!(subscription = %id, removed, "listener unsubscribed");
        removed
    }

    /// Player entry point: acknowledges start of the current session.
    pub fn notify_started(&self) {
        self.shared.notify_started(None);
    }

    /// Player entry point: raises an event in the current session.
    pub fn emit(&self, name: &str, data: serde_json::Value) -> Delivery {
        self.shared.emit(None, name, data)
    }

    /// Player entry point: completes the current session. Returns `true` if
    /// a completion handler ran.
    pub fn complete(&self, result: CompletionResult) -> bool {
        self.shared.complete(None, result)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.shared.inner.lock().state()
    }

    /// Point-in-time view of the controller.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.shared.inner.lock();
        SessionSnapshot {
            state: inner.state(),
            session_id: inner.session.as_ref().map(Session::id),
            completion_pending: inner
                .session
                .as_ref()
                .is_some_and(Session::has_pending_completion),
            subscriber_count: inner.registry.len(),
        }
    }

    /// Watches state transitions.
    #[must_use]
    pub fn state_changes(&self) -> watch::Receiver<SessionState> {
        self.shared.state_tx.subscribe()
    }

    /// Waits until the launched player has acknowledged start.
    ///
    /// Resolves immediately if the session has already moved past
    /// `Running`. Call after `launch`.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::SessionTerminated` if the session ended before
    /// the player came up, or `BridgeError::NoActiveSession` if nothing has
    /// been launched since the controller was created or reset.
    pub async fn wait_until_running(&self) -> Result<(), BridgeError> {
        let mut rx = self.state_changes();
        let state = *rx
            .wait_for(|state| *state != SessionState::Starting)
            .await
            .map_err(|_| BridgeError::SessionTerminated)?;
        match state {
            SessionState::Idle => Err(BridgeError::NoActiveSession),
            SessionState::Terminated => Err(BridgeError::SessionTerminated),
            SessionState::Starting | SessionState::Running | SessionState::Completing => Ok(()),
        }
    }

    fn start_session(
        &self,
        options: &LaunchOptions,
        handler: Option<CompletionHandler>,
    ) -> Result<Uuid, BridgeError> {
        let session_id = Uuid::now_v7();
        {
            let mut inner = self.shared.inner.lock();
            if let Some(session) = inner.session.as_ref().filter(|s| s.state().is_active()) {
                return Err(BridgeError::AlreadyActive(session.id()));
            }
            inner.session = Some(Session::launch(session_id, handler));
            self.shared.publish(SessionState::Starting);
        }
        tracing::info!(%session_id, scene = ?options.scene, "launching player session");

        let link = PlayerLink::new(Arc::downgrade(&self.shared), session_id);
        match self.shared.player.start(options, Arc::new(link)) {
            Ok(instance) => {
                self.shared.attach(session_id, instance);
                if self.shared.config.start_acknowledgement == StartAcknowledgement::Implicit {
                    self.shared.enter_running(session_id);
                }
                Ok(session_id)
            }
            Err(err) => {
                {
                    let mut inner = self.shared.inner.lock();
                    if let Some(session) = inner.session.as_mut().filter(|s| s.id() == session_id) {
                        // The player never ran; nothing to release.
                        if session.teardown().is_ok() {
                            self.shared.publish(SessionState::Terminated);
                        }
                    }
                }
                tracing::warn!(%session_id, error = %err, "player failed to start");
                Err(BridgeError::PlayerStart(err))
            }
        }
    }
}

impl Shared {
    fn publish(&self, state: SessionState) {
        self.state_tx.send_replace(state);
        tracing::debug!(%state, "player session state changed");
    }

    fn attach(&self, session_id: Uuid, instance: Box<dyn PlayerInstance>) {
        let rejected = {
            let mut inner = self.inner.lock();
            match inner.session.as_mut().filter(|s| s.id() == session_id) {
                Some(session) => session.attach_instance(instance).err(),
                None => Some(instance),
            }
        };
        if let Some(instance) = rejected {
            tracing::debug!(%session_id, "session ended while the player was starting");
            instance.release();
        }
    }

    fn enter_running(&self, session_id: Uuid) {
        let mut inner = self.inner.lock();
        if let Some(session) = inner.session.as_mut().filter(|s| s.id() == session_id) {
            if let Ok(true) = session.acknowledge_start() {
                self.publish(SessionState::Running);
            }
        }
    }

    pub(crate) fn notify_started(&self, scope: Option<Uuid>) {
        let outcome = {
            let mut inner = self.inner.lock();
            let outcome = match scoped(&mut inner, scope) {
                Some(session) => session.acknowledge_start(),
                None => Err(BridgeError::NoActiveSession),
            };
            if let Ok(true) = outcome {
                self.publish(SessionState::Running);
            }
            outcome
        };
        match outcome {
            Ok(true) => tracing::info!("player acknowledged start"),
            Ok(false) => tracing::debug!("duplicate start acknowledgement ignored"),
            Err(err) => self.reporter.report(&err),
        }
    }

    pub(crate) fn emit(&self, scope: Option<Uuid>, name: &str, data: serde_json::Value) -> Delivery {
        let prepared = {
            let mut inner = self.inner.lock();
            let metadata = match scoped(&mut inner, scope) {
                Some(session) => session.next_event_metadata(self.clock.as_ref()),
                None => Err(BridgeError::NoActiveSession),
            };
            metadata.map(|metadata| (metadata, inner.registry.snapshot()))
        };
        let (metadata, subscribers) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                self.reporter.report(&err);
                return Delivery::default();
            }
        };

        let event = PlayerEvent {
            metadata,
            name: name.to_owned(),
            data,
        };
        tracing::trace!(
            session_id = %event.metadata.session_id,
            sequence = event.metadata.sequence_number,
            name,
            "delivering player event"
        );

        let mut delivery = Delivery::default();
        for (subscription_id, listener) in subscribers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(&event)))
                .unwrap_or_else(|payload| Err(ListenerError::Panicked(panic_message(&*payload))));
            match outcome {
                Ok(()) => delivery.delivered += 1,
                Err(source) => {
                    let failure = SubscriberError {
                        subscription_id,
                        event_name: event.name.clone(),
                        source,
                    };
                    self.reporter.report(&BridgeError::Subscriber(failure.clone()));
                    delivery.failures.push(failure);
                }
            }
        }
        delivery
    }

    pub(crate) fn complete(&self, scope: Option<Uuid>, result: CompletionResult) -> bool {
        let begun = {
            let mut inner = self.inner.lock();
            if inner.session.is_none() {
                Err(BridgeError::NoActiveSession)
            } else {
                match scoped(&mut inner, scope) {
                    Some(session) => session.begin_completion().map(|handler| {
                        self.publish(SessionState::Completing);
                        (session.id(), handler)
                    }),
                    None => Err(BridgeError::NoPendingCompletion),
                }
            }
        };
        let (session_id, handler) = match begun {
            Ok(begun) => begun,
            Err(err) => {
                self.reporter.report(&err);
                return false;
            }
        };

        let invoked = match handler {
            Some(handler) => {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| handler.invoke(result))) {
                    tracing::error!(
                        %session_id,
                        panic = %panic_message(&*payload),
                        "completion handler panicked"
                    );
                }
                true
            }
            None => {
                self.reporter.report(&BridgeError::NoPendingCompletion);
                false
            }
        };

        let instance = {
            let mut inner = self.inner.lock();
            match inner.session.as_mut().filter(|s| s.id() == session_id) {
                Some(session) => {
                    // A handler that tore the session down already published.
                    let finishing = session.state() == SessionState::Completing;
                    let instance = session.finish_completion();
                    if finishing {
                        self.publish(SessionState::Terminated);
                    }
                    instance
                }
                None => None,
            }
        };
        if let Some(instance) = instance {
            instance.release();
        }
        tracing::info!(%session_id, invoked, "player session completed");
        invoked
    }
}

/// The current session, if `scope` is `None` or names it.
fn scoped(inner: &mut Inner, scope: Option<Uuid>) -> Option<&mut Session> {
    inner
        .session
        .as_mut()
        .filter(|session| scope.is_none_or(|id| session.id() == id))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
