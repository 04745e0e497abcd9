// src/config/mod.rs

//! Configuration for goreload.
//!
//! Responsibilities:
//! - Define the optional TOML file model and the resolved runtime config
//!   (`model.rs`).
//! - Load the file and bootstrap the daemon from CLI + file + workspace
//!   (`loader.rs`).
//! - Validate the file (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{bootstrap, load_and_validate, load_from_path};
pub use model::{
    BuildSection, ConfigFile, DaemonConfig, RawConfigFile, RunSection, WatchSection,
};
