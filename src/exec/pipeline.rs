// src/exec/pipeline.rs

//! The rebuild cycle: stop the old program, build, start the new one.

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::engine::slot::CycleTicket;
use crate::engine::state::DaemonState;
use crate::exec::backend::ProcessBackend;

/// Runs one rebuild cycle per relevant Write event.
///
/// Cycles never overlap: the router holds back the next event until the
/// cycle's [`CycleTicket`] has been released. The ticket is released once
/// the new program is running, or as soon as it is clear nothing will be
/// launched.
pub struct RebuildPipeline<B: ProcessBackend> {
    backend: Arc<B>,
    state: Arc<DaemonState>,
}

impl<B: ProcessBackend> std::fmt::Debug for RebuildPipeline<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RebuildPipeline")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend> RebuildPipeline<B> {
    pub fn new(backend: Arc<B>, state: Arc<DaemonState>) -> Self {
        Self { backend, state }
    }

    pub fn state(&self) -> &Arc<DaemonState> {
        &self.state
    }

    /// React to a write to `path`.
    ///
    /// Files without the source extension release the ticket straight away
    /// and never reach the build step.
    pub async fn handle_write(&self, path: &Path, ticket: CycleTicket) {
        debug!(path = ?path, child = ?self.state.child.pid(), "handle write");

        if !self.state.config.is_source_file(path) {
            debug!(path = ?path, "not a source file; skipping build");
            ticket.release();
            return;
        }

        self.run_cycle(ticket).await;
    }

    /// Terminate the previous program, build, and relaunch if configured.
    pub async fn run_cycle(&self, ticket: CycleTicket) {
        self.terminate_previous();

        let built = self.build().await;

        let Some(run_command) = self.state.config.run_command.clone() else {
            ticket.release();
            return;
        };

        if !built && !self.state.config.relaunch_on_build_failure {
            info!("build failed; not starting the program until the next successful build");
            ticket.release();
            return;
        }

        // The ticket travels with the launch task and is released there.
        let _launch = self.spawn_launch(run_command, ticket);
    }

    fn terminate_previous(&self) {
        let Some(child) = self.state.child.current() else {
            return;
        };
        match self.backend.terminate_group(child.pid) {
            Ok(()) => info!(pid = child.pid, "kill pid"),
            Err(err) => warn!(pid = child.pid, error = %err, "failed to stop previous program"),
        }
    }

    /// Run the build command and print its output. Returns whether it
    /// succeeded.
    async fn build(&self) -> bool {
        let cfg = &self.state.config;
        debug!(cmd = %cfg.build_command, "start compile");

        match self.backend.build(&cfg.build_command, &cfg.root).await {
            Ok(out) => {
                if !out.success {
                    match out.code {
                        Some(code) => println!("build error: exit status {code}"),
                        None => println!("build error: terminated by signal"),
                    }
                }
                let text = out.output.trim_end();
                if !text.is_empty() {
                    println!("{text}");
                }
                out.success
            }
            Err(err) => {
                println!("build error: {err:#}");
                false
            }
        }
    }

    /// Start the run command in the background and supervise it until it
    /// exits.
    ///
    /// If the launch fails the ticket is dropped, which releases the slot.
    fn spawn_launch(&self, run_command: String, ticket: CycleTicket) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            debug!(cmd = %run_command, "start run program");

            let launched = match backend.launch(&run_command, &state.config.root) {
                Ok(child) => child,
                Err(err) => {
                    error!(cmd = %run_command, error = %err, "failed to start program");
                    drop(ticket);
                    return;
                }
            };

            let record = state.child.record(launched.pid);
            debug!(pid = record.pid, "run cmd pid");
            ticket.release();

            match launched.exit.await {
                Ok(exit) if exit.success => info!(pid = record.pid, "program exited"),
                Ok(exit) => info!(pid = record.pid, status = %exit, "program stopped"),
                Err(err) => warn!(pid = record.pid, error = %err, "run error"),
            }

            if !state.child.clear_if(record.generation) {
                debug!(pid = record.pid, "newer program already recorded; leaving it in place");
            }
        })
    }
}
