//! Launcher — player session lifecycle.
//!
//! Owns the launch/teardown lifecycle of the embedded player, the single
//! pending completion handler, and fan-out of player events to host
//! subscribers.

pub mod application;
pub mod config;
pub mod domain;

pub use application::controller::{BridgeController, SessionSnapshot};
pub use application::link::PlayerLink;
pub use config::{ControllerConfig, StartAcknowledgement};
pub use domain::state::SessionState;
