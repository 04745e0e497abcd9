#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use goreload::config::DaemonConfig;
use goreload::engine::{DaemonState, EventRouter};
use goreload::exec::RebuildPipeline;
use goreload::fs::mock::MockFileSystem;
use goreload::watch::{FsEvent, FsOp, WatchRegistry};
use goreload_test_utils::fake_backend::FakeBackend;
use goreload_test_utils::recording_notifier::RecordingNotifier;

pub use goreload_test_utils::{init_tracing, with_timeout};

/// Router wired to an in-memory filesystem, a recording notifier and a fake
/// process backend.
pub struct Harness {
    pub fs: MockFileSystem,
    pub notifier: RecordingNotifier,
    pub backend: Arc<FakeBackend>,
    pub state: Arc<DaemonState>,
    pub router: EventRouter<RecordingNotifier, FakeBackend>,
    pub tx: mpsc::UnboundedSender<FsEvent>,
}

impl Harness {
    pub fn new(fs: MockFileSystem, config: DaemonConfig) -> Self {
        init_tracing();

        let notifier = RecordingNotifier::new();
        let backend = FakeBackend::new();
        let state = Arc::new(DaemonState::new(config));

        let registry = WatchRegistry::new(notifier.clone(), Arc::new(fs.clone()), state.exclusions());
        let pipeline = RebuildPipeline::new(Arc::clone(&backend), Arc::clone(&state));
        let (tx, rx) = mpsc::unbounded_channel();
        let router = EventRouter::new(registry, pipeline, rx);

        Self {
            fs,
            notifier,
            backend,
            state,
            router,
            tx,
        }
    }

    pub async fn create(&mut self, path: impl AsRef<Path>) {
        self.dispatch(path, FsOp::Create).await;
    }

    pub async fn write(&mut self, path: impl AsRef<Path>) {
        self.dispatch(path, FsOp::Write).await;
    }

    pub async fn remove(&mut self, path: impl AsRef<Path>) {
        self.dispatch(path, FsOp::Remove).await;
    }

    pub async fn dispatch(&mut self, path: impl AsRef<Path>, op: FsOp) {
        let event = FsEvent::new(path.as_ref(), op);
        with_timeout(self.router.dispatch(event)).await;
    }
}

/// A small Go workspace at `/ws` with a `.git` directory.
pub fn go_workspace() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/ws/go.mod", "module example.com/ws");
    fs.add_file("/ws/main.go", "package main");
    fs.add_file("/ws/.git/HEAD", "ref: refs/heads/main");
    fs
}

/// Poll `cond` until it holds or a second has passed.
pub async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
