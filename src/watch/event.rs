// src/watch/event.rs

//! Filesystem events as seen by the router.

use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind, RenameMode};

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Create,
    Write,
    Remove,
    Rename,
    Other,
}

/// A single `(path, operation)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub path: PathBuf,
    pub op: FsOp,
}

impl FsEvent {
    pub fn new(path: impl Into<PathBuf>, op: FsOp) -> Self {
        Self {
            path: path.into(),
            op,
        }
    }

    /// Split a `notify` event into one `FsEvent` per affected path.
    ///
    /// A rename reported with both ends (`[from, to]`) becomes a Rename for
    /// the old path and a Create for the new one.
    pub fn from_notify(event: notify::Event) -> Vec<FsEvent> {
        if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
            let ops = [FsOp::Rename, FsOp::Create];
            return event
                .paths
                .into_iter()
                .zip(ops)
                .map(|(path, op)| FsEvent { path, op })
                .collect();
        }

        let op = FsOp::from(&event.kind);
        event
            .paths
            .into_iter()
            .map(|path| FsEvent { path, op })
            .collect()
    }
}

impl From<&EventKind> for FsOp {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => FsOp::Create,
            EventKind::Remove(_) => FsOp::Remove,
            // The arriving end of a move looks like a new entry.
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => FsOp::Create,
            EventKind::Modify(ModifyKind::Name(_)) => FsOp::Rename,
            EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
                FsOp::Write
            }
            _ => FsOp::Other,
        }
    }
}
