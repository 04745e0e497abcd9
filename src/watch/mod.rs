// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Deciding which directories are excluded (`exclude`).
//! - Walking the tree lazily (`walk`) and registering each directory with
//!   the OS notifier exactly once (`registry`).
//! - Wrapping `notify` behind the [`Notifier`] trait and turning its events
//!   into [`FsEvent`]s (`notifier`, `event`).
//!
//! It does **not** know about builds or processes; the router in
//! [`crate::engine`] decides what an event means.

pub mod event;
pub mod exclude;
pub mod notifier;
pub mod registry;
pub mod walk;

pub use event::{FsEvent, FsOp};
pub use exclude::ExclusionSet;
pub use notifier::{Notifier, NotifyWatcher};
pub use registry::WatchRegistry;
pub use walk::DirWalk;
