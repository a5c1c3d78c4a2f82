//! Session application services.
//!
//! This module contains the per-surface session controller and its state
//! machine.

mod controller;
mod state;

pub use controller::{CloseHandle, ERROR_TURN_PREFIX, SessionController};
pub use state::SessionState;
