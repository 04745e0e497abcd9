// src/engine/shutdown.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::engine::state::DaemonState;
use crate::errors::EXIT_INTERRUPTED_OR_PRECONDITION;
use crate::exec::ProcessBackend;

/// Stop the supervised program, if any, and return the exit status the
/// daemon should use.
///
/// The signal is fire-and-forget; the child's exit is not awaited.
pub async fn shutdown<B: ProcessBackend>(state: &DaemonState, backend: &B, grace: Duration) -> i32 {
    if let Some(child) = state.child.current() {
        debug!(pid = child.pid, "kill process");
        if !grace.is_zero() {
            tokio::time::sleep(grace).await;
        }
        // Re-read: a relaunch may have happened during the grace period.
        if let Some(child) = state.child.current() {
            if let Err(err) = backend.terminate_group(child.pid) {
                warn!(pid = child.pid, error = %err, "failed to stop program on shutdown");
            }
        }
    }
    EXIT_INTERRUPTED_OR_PRECONDITION
}

/// Wait for Ctrl-C, stop the program and exit the process.
pub fn spawn_shutdown_handler<B: ProcessBackend>(
    state: Arc<DaemonState>,
    backend: Arc<B>,
    grace: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {e}");
            return;
        }
        info!("interrupt received; shutting down");
        let code = shutdown(&state, backend.as_ref(), grace).await;
        std::process::exit(code);
    })
}
