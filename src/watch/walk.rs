// src/watch/walk.rs

//! Lazy, exclusion-aware directory walk.
//!
//! The walk performs no registration itself; it only yields the directories
//! that should be watched. [`crate::watch::registry`] folds over it.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::FileSystem;
use crate::watch::exclude::ExclusionSet;

/// Depth-first iterator over the non-excluded directories below (and
/// including) a starting path.
///
/// A directory is yielded only after it has been listed successfully.
/// Paths that cannot be listed (plain files, permission errors, directories
/// deleted while the walk is running) are skipped silently.
pub struct DirWalk<'a> {
    fs: &'a dyn FileSystem,
    exclusions: &'a ExclusionSet,
    stack: Vec<PathBuf>,
}

impl<'a> DirWalk<'a> {
    pub fn new(fs: &'a dyn FileSystem, exclusions: &'a ExclusionSet, start: &Path) -> Self {
        Self {
            fs,
            exclusions,
            stack: vec![start.to_path_buf()],
        }
    }
}

impl Iterator for DirWalk<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        while let Some(dir) = self.stack.pop() {
            if self.exclusions.is_excluded(&dir) {
                debug!(path = ?dir, "exclude");
                continue;
            }

            let entries = match self.fs.list_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(path = ?dir, error = %err, "not watching");
                    continue;
                }
            };

            let mut children: Vec<PathBuf> = entries
                .into_iter()
                .filter(|e| e.is_dir)
                .map(|e| e.path)
                .collect();
            // Reverse so children are visited in listing order.
            children.reverse();
            self.stack.extend(children);

            return Some(dir);
        }
        None
    }
}
