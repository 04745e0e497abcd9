// src/watch/exclude.rs

//! Exclusion matching for the watch registry.

use std::path::{Path, PathBuf};

/// Set of absolute paths whose whole subtree is ignored.
///
/// Matching is component-wise: `/ws/.git` excludes `/ws/.git` and
/// `/ws/.git/objects`, but not `/ws/.gitignore`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    paths: Vec<PathBuf>,
}

impl ExclusionSet {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    /// Build from a whitespace-separated list of paths relative to `root`,
    /// e.g. `".git vendor tmp"`.
    pub fn from_list(root: &Path, list: &str) -> Self {
        Self::new(list.split_whitespace().map(|rel| root.join(rel)))
    }

    /// Add more entries relative to `root`.
    pub fn extend_relative<I, S>(&mut self, root: &Path, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        for rel in entries {
            let abs = root.join(rel);
            if !self.paths.contains(&abs) {
                self.paths.push(abs);
            }
        }
    }

    /// True if `path` is one of the excluded paths or lies below one.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.paths.iter().any(|excluded| path.starts_with(excluded))
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
