// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ProcessBackend` trait and the real
//!   `ShellBackend` (`sh -c` through `tokio::process`, SIGTERM through
//!   `nix`). Tests swap in a fake.
//! - [`child`] tracks the one supervised run-process.
//! - [`pipeline`] runs the terminate → build → relaunch cycle.

pub mod backend;
pub mod child;
pub mod pipeline;

pub use backend::{BuildOutput, ChildExit, LaunchedChild, ProcessBackend, ShellBackend};
pub use child::{ChildRecord, ChildSlot};
pub use pipeline::RebuildPipeline;
