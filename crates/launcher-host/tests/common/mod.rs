//! Shared helpers for host integration tests.
#![allow(dead_code)]

use std::time::Duration;

use launcher_host::HostConfig;
use launcher_session::ControllerConfig;

/// A config whose simulated player finishes in a few milliseconds.
pub fn fast_config(scene: &str, steps: u32) -> HostConfig {
    HostConfig::from_lookup(|key| match key {
        "LAUNCHER_SCENE" => Some(scene.to_owned()),
        "LAUNCHER_PROGRESS_STEPS" => Some(steps.to_string()),
        "LAUNCHER_STEP_DELAY_MS" => Some("1".to_owned()),
        _ => None,
    })
    .unwrap()
}

/// Same as [`fast_config`] but entering `Running` without acknowledgement.
pub fn fast_implicit_config(scene: &str, steps: u32) -> HostConfig {
    HostConfig {
        controller: ControllerConfig::implicit_start(),
        ..fast_config(scene, steps)
    }
}

/// A config whose simulated player takes long enough to be interrupted.
pub fn slow_config(scene: &str) -> HostConfig {
    HostConfig {
        progress_steps: 100,
        step_delay: Duration::from_millis(50),
        ..fast_config(scene, 1)
    }
}
