// src/errors.rs

//! Crate-wide error type and exit-code mapping.

use std::path::PathBuf;

use thiserror::Error;

/// Exit status used for a missing build manifest and for Ctrl-C shutdown.
pub const EXIT_INTERRUPTED_OR_PRECONDITION: i32 = 2;

#[derive(Error, Debug)]
pub enum GoreloadError {
    #[error("the watch directory {dir:?} must contain {manifest}")]
    MissingManifest { manifest: String, dir: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GoreloadError {
    /// Process exit status for a fatal startup error of this kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            GoreloadError::MissingManifest { .. } => EXIT_INTERRUPTED_OR_PRECONDITION,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, GoreloadError>;
