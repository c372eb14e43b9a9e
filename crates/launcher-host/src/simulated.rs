//! A stand-in player that runs on the tokio runtime.
//!
//! It acknowledges start, raises `progress` events, announces the end of
//! its scene and completes with a score, pausing between each step. Useful
//! for exercising a host without the real engine.

use std::sync::Arc;
use std::time::Duration;

use launcher_core::error::PlayerError;
use launcher_core::options::{CompletionResult, LaunchOptions};
use launcher_core::player::{Player, PlayerChannel, PlayerInstance};
use serde_json::json;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Pacing of a simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedScript {
    /// Progress events raised before completing.
    pub progress_steps: u32,
    /// Pause before each step.
    pub step_delay: Duration,
}

/// Player that plays back a [`SimulatedScript`].
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    runtime: Handle,
    script: SimulatedScript,
}

impl SimulatedPlayer {
    /// Creates a player that spawns its runs on `runtime`.
    #[must_use]
    pub fn new(runtime: Handle, script: SimulatedScript) -> Self {
        Self { runtime, script }
    }
}

impl Player for SimulatedPlayer {
    fn start(
        &self,
        options: &LaunchOptions,
        channel: Arc<dyn PlayerChannel>,
    ) -> Result<Box<dyn PlayerInstance>, PlayerError> {
        let scene = options
            .scene
            .clone()
            .ok_or_else(|| PlayerError::InvalidOptions("a scene is required".into()))?;
        let task = self.runtime.spawn(play(scene, self.script, channel));
        Ok(Box::new(SimulatedInstance { task }))
    }
}

async fn play(scene: String, script: SimulatedScript, channel: Arc<dyn PlayerChannel>) {
    let session_id = channel.session_id();
    tracing::debug!(%session_id, %scene, "simulated player booting");

    tokio::time::sleep(script.step_delay).await;
    channel.notify_started();

    for step in 1..=script.progress_steps {
        tokio::time::sleep(script.step_delay).await;
        channel.emit(
            "progress",
            json!({ "scene": scene, "pct": progress_pct(step, script.progress_steps) }),
        );
    }

    channel.emit("scene_finished", json!({ "scene": scene }));
    channel.complete(CompletionResult::from(json!({
        "scene": scene,
        "score": score(script.progress_steps),
    })));
}

/// Percentage after `step` of `steps`, widened so any `u32` count is safe.
fn progress_pct(step: u32, steps: u32) -> u64 {
    u64::from(step) * 100 / u64::from(steps.max(1))
}

fn score(steps: u32) -> u64 {
    u64::from(steps) * 10
}

struct SimulatedInstance {
    task: JoinHandle<()>,
}

impl PlayerInstance for SimulatedInstance {
    fn release(self: Box<Self>) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use launcher_session::{BridgeController, ControllerConfig, SessionState};
    use launcher_test_support::RecordingListener;

    use super::*;

    fn quick_player() -> Arc<SimulatedPlayer> {
        Arc::new(SimulatedPlayer::new(
            Handle::current(),
            SimulatedScript {
                progress_steps: 2,
                step_delay: Duration::from_millis(1),
            },
        ))
    }

    #[tokio::test]
    async fn test_simulated_run_reports_progress_then_completes() {
        // Arrange
        let controller = BridgeController::new(quick_player(), ControllerConfig::default());
        let listener = Arc::new(RecordingListener::new());
        controller.subscribe(listener.clone());

        // Act
        let (_, rx) = controller
            .launch_awaitable(&LaunchOptions::for_scene("arena"))
            .unwrap();
        let result = rx.await.unwrap();

        // Assert
        assert_eq!(result.value(), &json!({ "scene": "arena", "score": 20 }));
        assert_eq!(
            listener.names(),
            vec!["progress", "progress", "scene_finished"]
        );
        assert_eq!(listener.events()[1].data["pct"], json!(100));
        assert_eq!(controller.state(), SessionState::Terminated);
    }

    #[test]
    fn test_progress_and_score_do_not_overflow_for_large_step_counts() {
        assert_eq!(progress_pct(u32::MAX, u32::MAX), 100);
        assert_eq!(progress_pct(u32::MAX / 2, u32::MAX), 49);
        assert_eq!(score(u32::MAX), u64::from(u32::MAX) * 10);
    }

    #[test]
    fn test_progress_counts_up_to_one_hundred() {
        let pcts: Vec<u64> = (1..=4).map(|step| progress_pct(step, 4)).collect();

        assert_eq!(pcts, vec![25, 50, 75, 100]);
    }

    #[tokio::test]
    async fn test_start_without_scene_is_refused() {
        let controller = BridgeController::new(quick_player(), ControllerConfig::default());

        let err = controller
            .launch_detached(&LaunchOptions::default())
            .unwrap_err();

        assert_eq!(
            err,
            launcher_core::error::BridgeError::PlayerStart(PlayerError::InvalidOptions(
                "a scene is required".into()
            ))
        );
    }

    #[tokio::test]
    async fn test_teardown_stops_the_run() {
        // Arrange
        let controller = BridgeController::new(
            Arc::new(SimulatedPlayer::new(
                Handle::current(),
                SimulatedScript {
                    progress_steps: 50,
                    step_delay: Duration::from_millis(20),
                },
            )),
            ControllerConfig::default(),
        );
        let listener = Arc::new(RecordingListener::new());
        controller.subscribe(listener.clone());
        let (_, rx) = controller
            .launch_awaitable(&LaunchOptions::for_scene("long"))
            .unwrap();

        // Act
        controller.teardown().unwrap();

        // Assert
        assert!(rx.await.is_err());
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(listener.events().is_empty());
    }
}
