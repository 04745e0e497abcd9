use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use goreload::watch::Notifier;

/// A notifier that only records which directories were added and removed.
///
/// Clones share the same log, so a test can keep one handle while the
/// registry owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    added: Arc<Mutex<Vec<PathBuf>>>,
    removed: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn added(&self) -> Vec<PathBuf> {
        self.added.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }

    /// How many times `dir` was added.
    pub fn add_count(&self, dir: impl AsRef<Path>) -> usize {
        let dir = dir.as_ref();
        self.added.lock().unwrap().iter().filter(|p| *p == dir).count()
    }
}

impl Notifier for RecordingNotifier {
    fn add(&mut self, dir: &Path) -> Result<()> {
        self.added.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }

    fn remove(&mut self, dir: &Path) -> Result<()> {
        self.removed.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }
}
