// src/engine/router.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::slot::CompletionSlot;
use crate::exec::{ProcessBackend, RebuildPipeline};
use crate::watch::{FsEvent, FsOp, Notifier, WatchRegistry};

/// Sole consumer of the notifier's event channel.
///
/// Create, Remove and Rename events keep the watch registry in step with
/// the tree; Write events drive the rebuild pipeline, one full cycle at a
/// time.
pub struct EventRouter<N: Notifier, B: ProcessBackend> {
    registry: WatchRegistry<N>,
    pipeline: RebuildPipeline<B>,
    slot: CompletionSlot,
    event_rx: mpsc::UnboundedReceiver<FsEvent>,
}

impl<N: Notifier, B: ProcessBackend> fmt::Debug for EventRouter<N, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<N: Notifier, B: ProcessBackend> EventRouter<N, B> {
    pub fn new(
        registry: WatchRegistry<N>,
        pipeline: RebuildPipeline<B>,
        event_rx: mpsc::UnboundedReceiver<FsEvent>,
    ) -> Self {
        Self {
            registry,
            pipeline,
            slot: CompletionSlot::new(),
            event_rx,
        }
    }

    pub fn registry(&self) -> &WatchRegistry<N> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WatchRegistry<N> {
        &mut self.registry
    }

    /// Main event loop. Returns once the event channel is closed.
    pub async fn run(&mut self) {
        info!("event router started");

        while let Some(event) = self.event_rx.recv().await {
            self.dispatch(event).await;
        }

        info!("event channel closed; router stopped");
    }

    /// Handle a single event. For Write events this returns only after the
    /// rebuild cycle has released its ticket.
    pub async fn dispatch(&mut self, event: FsEvent) {
        if self.registry.exclusions().is_excluded(&event.path) {
            debug!(path = ?event.path, op = ?event.op, "ignoring event in excluded path");
            return;
        }

        match event.op {
            // A directory moved away no longer lives at this path; forget
            // it so a new one created here is watched again.
            FsOp::Remove | FsOp::Rename => self.registry.unregister(&event.path),
            FsOp::Create => {
                let added = self.registry.register_tree(&event.path);
                if added > 0 {
                    debug!(path = ?event.path, added, "registered new directories");
                }
            }
            FsOp::Write => {
                debug!(path = ?event.path, "receive write");
                self.pipeline.handle_write(&event.path, self.slot.ticket()).await;
                self.slot.wait().await;
                debug!(path = ?event.path, "write handled");
            }
            FsOp::Other => {}
        }
    }

    /// Run one full cycle without waiting for a change (`--build-on-start`).
    pub async fn rebuild_now(&mut self) {
        self.pipeline.run_cycle(self.slot.ticket()).await;
        self.slot.wait().await;
    }
}
