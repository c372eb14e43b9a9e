//! Session domain: state machine, completion slot, subscriber registry.

pub mod completion;
pub mod registry;
pub mod session;
pub mod state;
