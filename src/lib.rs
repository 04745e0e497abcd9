// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod watch;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cli::CliArgs;
use crate::config::bootstrap;
use crate::engine::{spawn_shutdown_handler, DaemonState, EventRouter};
use crate::errors::Result;
use crate::exec::{RebuildPipeline, ShellBackend};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{NotifyWatcher, WatchRegistry};

/// Delay before stopping the program on Ctrl-C in debug mode.
const DEBUG_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - bootstrap (workspace, config file, manifest check)
/// - the notifier and the initial recursive registration
/// - Ctrl-C handling
/// - the event router driving the rebuild pipeline
///
/// Only returns on a startup error; afterwards the process ends through the
/// Ctrl-C handler.
pub async fn run(args: CliArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let config = bootstrap(&args, &cwd, fs.as_ref())?;

    info!(
        root = ?config.root,
        build = %config.build_command,
        run = ?config.run_command,
        "goreload starting"
    );

    let state = Arc::new(DaemonState::new(config));
    let backend = Arc::new(ShellBackend);

    let (watcher, event_rx) = NotifyWatcher::spawn()?;
    let mut registry = WatchRegistry::new(watcher, fs, state.exclusions());
    let watched = registry.register_tree(&state.config.root);
    info!(directories = watched, "file watcher started on {:?}", state.config.root);

    let grace = if state.config.debug {
        DEBUG_SHUTDOWN_GRACE
    } else {
        Duration::ZERO
    };
    let _shutdown = spawn_shutdown_handler(Arc::clone(&state), Arc::clone(&backend), grace);

    let pipeline = RebuildPipeline::new(backend, Arc::clone(&state));
    let mut router = EventRouter::new(registry, pipeline, event_rx);

    if state.config.build_on_start {
        router.rebuild_now().await;
    }

    router.run().await;

    // The notifier is gone, but the program may still be running; keep
    // serving Ctrl-C until the user stops us.
    std::future::pending::<()>().await;
    Ok(())
}
