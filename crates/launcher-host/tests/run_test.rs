//! Integration tests for the host runner.

mod common;

use std::time::Duration;

use launcher_core::error::BridgeError;
use launcher_core::event::PlayerEvent;
use launcher_host::AppError;
use launcher_session::SessionState;
use serde_json::json;

#[tokio::test]
async fn test_run_collects_events_and_result() {
    let config = common::fast_config("A", 2);

    let outcome = launcher_host::run(config).await.unwrap();

    assert_eq!(outcome.result.value(), &json!({ "scene": "A", "score": 20 }));
    let names: Vec<&str> = outcome.events.iter().map(PlayerEvent::name).collect();
    assert_eq!(names, vec!["progress", "progress", "scene_finished"]);
    assert!(
        outcome
            .events
            .iter()
            .all(|event| event.session_id() == outcome.session_id)
    );
    let sequence: Vec<u64> = outcome
        .events
        .iter()
        .map(|e| e.metadata.sequence_number)
        .collect();
    assert_eq!(sequence, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_run_with_implicit_start() {
    let config = common::fast_implicit_config("B", 1);

    let outcome = launcher_host::run(config).await.unwrap();

    assert_eq!(outcome.result.value()["scene"], json!("B"));
}

#[tokio::test]
async fn test_teardown_during_run_is_aborted() {
    // Arrange
    let config = common::slow_config("C");
    let controller = launcher_host::build_controller(&config);
    let interrupt = controller.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        interrupt.teardown().unwrap();
    });

    // Act
    let err = launcher_host::run_with(&controller, &config.launch)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, AppError::Aborted(_)));
    assert_eq!(controller.state(), SessionState::Terminated);
    assert_eq!(controller.snapshot().subscriber_count, 0);
}

#[tokio::test]
async fn test_run_with_rejects_second_launch_while_active() {
    // Arrange
    let config = common::slow_config("D");
    let controller = launcher_host::build_controller(&config);
    let active = controller.launch_detached(&config.launch).unwrap();

    // Act
    let err = launcher_host::run_with(&controller, &config.launch)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, AppError::Bridge(BridgeError::AlreadyActive(id)) if id == active));
    assert_eq!(controller.snapshot().subscriber_count, 0);
    controller.teardown().unwrap();
}

#[tokio::test]
async fn test_controller_runs_sessions_back_to_back() {
    let config = common::fast_config("E", 1);
    let controller = launcher_host::build_controller(&config);

    let first = launcher_host::run_with(&controller, &config.launch).await.unwrap();
    let second = launcher_host::run_with(&controller, &config.launch).await.unwrap();

    assert_ne!(first.session_id, second.session_id);
    assert_eq!(second.events.len(), 2);
}
