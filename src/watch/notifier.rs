// src/watch/notifier.rs

use std::path::Path;

use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::watch::event::FsEvent;

/// Per-directory registration with the OS change notifier.
///
/// Registrations are never recursive; the registry walks the tree and adds
/// each directory itself.
pub trait Notifier: Send {
    fn add(&mut self, dir: &Path) -> Result<()>;
    fn remove(&mut self, dir: &Path) -> Result<()>;
}

/// [`Notifier`] backed by `notify`'s platform watcher.
///
/// Dropping this stops file watching.
pub struct NotifyWatcher {
    inner: RecommendedWatcher,
}

impl std::fmt::Debug for NotifyWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyWatcher").finish()
    }
}

impl NotifyWatcher {
    /// Create the platform watcher and the channel its events arrive on.
    ///
    /// The channel is unbounded: events are queued while a rebuild runs,
    /// never dropped on our side.
    pub fn spawn() -> notify::Result<(Self, mpsc::UnboundedReceiver<FsEvent>)> {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<FsEvent>();

        // Closure called synchronously by notify whenever an event arrives.
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for fs_event in FsEvent::from_notify(event) {
                        if event_tx.send(fs_event).is_err() {
                            // Router is gone; nothing left to notify.
                            return;
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "file watch error");
                }
            },
            Config::default(),
        )?;

        Ok((Self { inner }, event_rx))
    }
}

impl Notifier for NotifyWatcher {
    fn add(&mut self, dir: &Path) -> Result<()> {
        self.inner
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("watching {:?}", dir))
    }

    fn remove(&mut self, dir: &Path) -> Result<()> {
        self.inner
            .unwatch(dir)
            .with_context(|| format!("unwatching {:?}", dir))
    }
}
