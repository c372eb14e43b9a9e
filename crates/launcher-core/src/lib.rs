//! Launcher Core — shared abstractions for the embedded player bridge.
//!
//! This crate defines the types that cross the boundary between the host
//! application and the embedded player: the error taxonomy, the event
//! envelope, launch options, and the ports the player and listeners
//! implement. It contains no session logic.

pub mod clock;
pub mod error;
pub mod event;
pub mod listener;
pub mod options;
pub mod player;
pub mod report;
