//! Drives one player session from launch to completion.

use std::sync::Arc;

use launcher_core::event::PlayerEvent;
use launcher_core::options::{CompletionResult, LaunchOptions};
use launcher_session::{BridgeController, SessionState};
use serde::Serialize;
use tokio::runtime::Handle;
use uuid::Uuid;

use crate::config::HostConfig;
use crate::error::AppError;
use crate::simulated::{SimulatedPlayer, SimulatedScript};

/// Everything a finished session produced.
#[derive(Debug, Clone, Serialize)]
pub struct HostRun {
    /// The session that ran.
    pub session_id: Uuid,
    /// Events received while the session ran, in delivery order.
    pub events: Vec<PlayerEvent>,
    /// The player's completion result.
    pub result: CompletionResult,
}

/// Builds a controller wired to the simulated player.
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn build_controller(config: &HostConfig) -> BridgeController {
    let player = SimulatedPlayer::new(
        Handle::current(),
        SimulatedScript {
            progress_steps: config.progress_steps,
            step_delay: config.step_delay,
        },
    );
    BridgeController::new(Arc::new(player), config.controller)
}

/// Runs one session against the simulated player.
///
/// # Errors
///
/// Returns `AppError` if the launch is rejected or the session ends without
/// a result.
pub async fn run(config: HostConfig) -> Result<HostRun, AppError> {
    let controller = build_controller(&config);
    run_with(&controller, &config.launch).await
}

/// Runs one session on an existing controller and waits for its result.
///
/// # Errors
///
/// Returns `AppError::Bridge` if the launch is rejected, or
/// `AppError::Aborted` if the session is torn down before completing.
pub async fn run_with(
    controller: &BridgeController,
    options: &LaunchOptions,
) -> Result<HostRun, AppError> {
    let (subscription, mut stream) = controller.subscribe_channel();
    let launched = controller.launch_awaitable(options);
    let (session_id, completion) = match launched {
        Ok(launched) => launched,
        Err(err) => {
            controller.unsubscribe(subscription);
            return Err(err.into());
        }
    };

    let mut states = controller.state_changes();
    let watcher = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            tracing::info!(%session_id, %state, "player session state");
            if state == SessionState::Terminated {
                break;
            }
        }
    });

    let collector = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = stream.recv().await {
            tracing::info!(
                %session_id,
                sequence = event.metadata.sequence_number,
                name = event.name(),
                data = %event.data,
                "player event"
            );
            events.push(event);
        }
        events
    });

    let result = completion.await;
    controller.unsubscribe(subscription);

    let events = collector.await.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "event collector failed");
        Vec::new()
    });
    watcher.abort();

    let result = result.map_err(|_| AppError::Aborted(session_id))?;
    tracing::info!(%session_id, result = %result.value(), "player session finished");
    Ok(HostRun {
        session_id,
        events,
        result,
    })
}
