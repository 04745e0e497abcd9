// src/engine/mod.rs

//! Orchestration for goreload.
//!
//! This module ties together:
//! - the shared daemon state (`state`)
//! - the completion slot that serializes rebuild cycles (`slot`)
//! - the event router that consumes filesystem events (`router`)
//! - Ctrl-C handling (`shutdown`)

pub mod router;
pub mod shutdown;
pub mod slot;
pub mod state;

pub use router::EventRouter;
pub use shutdown::{shutdown, spawn_shutdown_handler};
pub use slot::{CompletionSlot, CycleTicket};
pub use state::DaemonState;
