//! Launcher host — runs one embedded player session end to end.
//!
//! Wires a [`BridgeController`](launcher_session::BridgeController) to a
//! player, streams the session's events into the log, and resolves with the
//! player's completion result.

pub mod config;
pub mod error;
pub mod runner;
pub mod simulated;

pub use config::HostConfig;
pub use error::AppError;
pub use runner::{HostRun, build_controller, run, run_with};
