// src/watch/registry.rs

//! Keeps the notifier's registration set in step with the directory tree.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::watch::exclude::ExclusionSet;
use crate::watch::notifier::Notifier;
use crate::watch::walk::DirWalk;

/// Recursive, exclusion-aware watch registry.
///
/// Every directory is registered with the notifier at most once; the
/// registry remembers what it added so repeated `register_tree` calls on the
/// same subtree are no-ops.
pub struct WatchRegistry<N: Notifier> {
    notifier: N,
    fs: Arc<dyn FileSystem>,
    exclusions: Arc<ExclusionSet>,
    registered: HashSet<PathBuf>,
}

impl<N: Notifier> std::fmt::Debug for WatchRegistry<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchRegistry")
            .field("registered", &self.registered.len())
            .finish_non_exhaustive()
    }
}

impl<N: Notifier> WatchRegistry<N> {
    pub fn new(notifier: N, fs: Arc<dyn FileSystem>, exclusions: Arc<ExclusionSet>) -> Self {
        Self {
            notifier,
            fs,
            exclusions,
            registered: HashSet::new(),
        }
    }

    /// Register `path` and every non-excluded directory below it.
    ///
    /// Returns how many directories were newly registered. Passing a plain
    /// file or a path that no longer exists is a silent no-op.
    pub fn register_tree(&mut self, path: &Path) -> usize {
        let fs = Arc::clone(&self.fs);
        let exclusions = Arc::clone(&self.exclusions);
        let walk = DirWalk::new(fs.as_ref(), exclusions.as_ref(), path);

        walk.fold(0, |added, dir| {
            if self.registered.contains(&dir) {
                return added;
            }
            match self.notifier.add(&dir) {
                Ok(()) => {
                    debug!(path = ?dir, "watch target");
                    self.registered.insert(dir);
                    added + 1
                }
                Err(err) => {
                    warn!(path = ?dir, error = %err, "failed to watch directory");
                    added
                }
            }
        })
    }

    /// Drop the registration for `path` after it was removed or renamed
    /// away.
    ///
    /// Only the exact path is removed from the notifier. Bookkeeping for
    /// anything nested below it is forgotten too, so the same directories
    /// are registered again if they are re-created.
    pub fn unregister(&mut self, path: &Path) {
        if let Err(err) = self.notifier.remove(path) {
            debug!(path = ?path, error = %err, "unwatch failed (path probably gone)");
        }
        self.registered.retain(|p| !p.starts_with(path));
    }

    pub fn is_registered(&self, path: &Path) -> bool {
        self.registered.contains(path)
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }
}
