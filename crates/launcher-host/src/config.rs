//! Host configuration, read from the environment.

use std::time::Duration;

use launcher_core::options::LaunchOptions;
use launcher_session::{ControllerConfig, StartAcknowledgement};

use crate::error::AppError;

const DEFAULT_SCENE: &str = "main";
const DEFAULT_PROGRESS_STEPS: u32 = 4;
const DEFAULT_STEP_DELAY_MS: u64 = 250;

/// Everything the host runner needs to drive one session.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Options passed to the player.
    pub launch: LaunchOptions,
    /// Controller settings.
    pub controller: ControllerConfig,
    /// Progress events the simulated player raises before completing.
    pub progress_steps: u32,
    /// Pause between simulated progress events.
    pub step_delay: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            launch: LaunchOptions::for_scene(DEFAULT_SCENE),
            controller: ControllerConfig::default(),
            progress_steps: DEFAULT_PROGRESS_STEPS,
            step_delay: Duration::from_millis(DEFAULT_STEP_DELAY_MS),
        }
    }
}

impl HostConfig {
    /// Reads configuration from the process environment.
    ///
    /// Recognized variables: `LAUNCHER_SCENE`, `LAUNCHER_PAYLOAD` (JSON),
    /// `LAUNCHER_START_ACK` (`explicit` or `implicit`),
    /// `LAUNCHER_PROGRESS_STEPS`, `LAUNCHER_STEP_DELAY_MS`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup` instead of the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(scene) = lookup("LAUNCHER_SCENE") {
            if scene.trim().is_empty() {
                return Err(AppError::Config("LAUNCHER_SCENE must not be empty".into()));
            }
            config.launch.scene = Some(scene);
        }

        if let Some(payload) = lookup("LAUNCHER_PAYLOAD") {
            config.launch.payload = serde_json::from_str(&payload)
                .map_err(|e| AppError::Config(format!("LAUNCHER_PAYLOAD must be valid JSON: {e}")))?;
        }

        if let Some(ack) = lookup("LAUNCHER_START_ACK") {
            config.controller.start_acknowledgement = match ack.to_ascii_lowercase().as_str() {
                "explicit" => StartAcknowledgement::Explicit,
                "implicit" => StartAcknowledgement::Implicit,
                other => {
                    return Err(AppError::Config(format!(
                        "LAUNCHER_START_ACK must be `explicit` or `implicit`, got `{other}`"
                    )));
                }
            };
        }

        if let Some(steps) = lookup("LAUNCHER_PROGRESS_STEPS") {
            config.progress_steps = steps
                .parse()
                .map_err(|e| AppError::Config(format!("LAUNCHER_PROGRESS_STEPS must be a valid u32: {e}")))?;
        }

        if let Some(delay) = lookup("LAUNCHER_STEP_DELAY_MS") {
            let millis: u64 = delay
                .parse()
                .map_err(|e| AppError::Config(format!("LAUNCHER_STEP_DELAY_MS must be a valid u64: {e}")))?;
            config.step_delay = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = HostConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, HostConfig::default());
        assert_eq!(config.launch.scene.as_deref(), Some("main"));
    }

    #[test]
    fn test_reads_all_variables() {
        let config = HostConfig::from_lookup(lookup_from(&[
            ("LAUNCHER_SCENE", "arena"),
            ("LAUNCHER_PAYLOAD", r#"{"difficulty":"hard"}"#),
            ("LAUNCHER_START_ACK", "Implicit"),
            ("LAUNCHER_PROGRESS_STEPS", "2"),
            ("LAUNCHER_STEP_DELAY_MS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.launch.scene.as_deref(), Some("arena"));
        assert_eq!(config.launch.payload, json!({ "difficulty": "hard" }));
        assert_eq!(
            config.controller.start_acknowledgement,
            StartAcknowledgement::Implicit
        );
        assert_eq!(config.progress_steps, 2);
        assert_eq!(config.step_delay, Duration::from_millis(5));
    }

    #[test]
    fn test_rejects_invalid_payload() {
        let err = HostConfig::from_lookup(lookup_from(&[("LAUNCHER_PAYLOAD", "{not json")]))
            .unwrap_err();

        assert!(matches!(err, AppError::Config(message) if message.contains("LAUNCHER_PAYLOAD")));
    }

    #[test]
    fn test_rejects_unknown_start_ack() {
        let err = HostConfig::from_lookup(lookup_from(&[("LAUNCHER_START_ACK", "sometimes")]))
            .unwrap_err();

        assert!(matches!(err, AppError::Config(message) if message.contains("sometimes")));
    }

    #[test]
    fn test_rejects_empty_scene() {
        let err = HostConfig::from_lookup(lookup_from(&[("LAUNCHER_SCENE", "  ")])).unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }
}
