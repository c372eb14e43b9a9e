//! Application layer: the controller the host drives and the link the
//! player drives.

pub mod controller;
pub mod link;
