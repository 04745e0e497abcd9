use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use goreload::exec::backend::BoxFuture;
use goreload::exec::{BuildOutput, ChildExit, LaunchedChild, ProcessBackend};
use tokio::sync::oneshot;

/// One call made against the backend, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Build(String),
    Launch(String),
    TerminateGroup(u32),
}

#[derive(Default)]
struct Inner {
    calls: Vec<BackendCall>,
    running: HashMap<u32, oneshot::Sender<ChildExit>>,
    next_pid: u32,
}

/// A fake process backend that:
/// - records every build / launch / terminate call in order
/// - hands out fake pids starting at 1001
/// - keeps "children" running until they are terminated or `exit_child`
///   is called
/// - can be told to fail builds or launches
#[derive(Default)]
pub struct FakeBackend {
    inner: Mutex<Inner>,
    build_fails: AtomicBool,
    launch_fails: AtomicBool,
    build_delay_ms: AtomicUsize,
    builds_in_flight: AtomicUsize,
    max_builds_in_flight: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_builds(&self, fail: bool) {
        self.build_fails.store(fail, Ordering::SeqCst);
    }

    pub fn fail_launches(&self, fail: bool) {
        self.launch_fails.store(fail, Ordering::SeqCst);
    }

    pub fn set_build_delay(&self, delay: Duration) {
        self.build_delay_ms
            .store(delay.as_millis() as usize, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn build_count(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::Build(_)))
    }

    pub fn launch_count(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::Launch(_)))
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::TerminateGroup(pid) => Some(pid),
                _ => None,
            })
            .collect()
    }

    /// Highest number of builds that were ever running at the same time.
    pub fn max_concurrent_builds(&self) -> usize {
        self.max_builds_in_flight.load(Ordering::SeqCst)
    }

    /// Let a running fake child exit on its own with `code`.
    pub fn exit_child(&self, pid: u32, code: i32) -> bool {
        let sender = self.inner.lock().unwrap().running.remove(&pid);
        match sender {
            Some(tx) => tx
                .send(ChildExit {
                    success: code == 0,
                    code: Some(code),
                })
                .is_ok(),
            None => false,
        }
    }

    fn count(&self, pred: impl Fn(&BackendCall) -> bool) -> usize {
        self.inner.lock().unwrap().calls.iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: BackendCall) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

impl ProcessBackend for FakeBackend {
    fn build<'a>(&'a self, cmd: &'a str, _dir: &'a Path) -> BoxFuture<'a, Result<BuildOutput>> {
        Box::pin(async move {
            self.record(BackendCall::Build(cmd.to_string()));

            let now = self.builds_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_builds_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = self.build_delay_ms.load(Ordering::SeqCst) as u64;
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            self.builds_in_flight.fetch_sub(1, Ordering::SeqCst);

            let output = if self.build_fails.load(Ordering::SeqCst) {
                BuildOutput {
                    success: false,
                    code: Some(2),
                    output: "./main.go:3:1: syntax error".to_string(),
                }
            } else {
                BuildOutput {
                    success: true,
                    code: Some(0),
                    output: String::new(),
                }
            };
            Ok::<_, anyhow::Error>(output)
        })
    }

    fn launch(&self, cmd: &str, _dir: &Path) -> Result<LaunchedChild> {
        self.record(BackendCall::Launch(cmd.to_string()));

        if self.launch_fails.load(Ordering::SeqCst) {
            return Err(anyhow!("sh: {cmd}: command not found"));
        }

        let (tx, rx) = oneshot::channel::<ChildExit>();
        let pid = {
            let mut inner = self.inner.lock().unwrap();
            inner.next_pid += 1;
            let pid = 1000 + inner.next_pid;
            inner.running.insert(pid, tx);
            pid
        };

        let exit: BoxFuture<'static, Result<ChildExit>> = Box::pin(async move {
            // A dropped sender means the backend went away; treat as killed.
            Ok::<_, anyhow::Error>(rx.await.unwrap_or(ChildExit {
                success: false,
                code: None,
            }))
        });

        Ok(LaunchedChild { pid, exit })
    }

    fn terminate_group(&self, pid: u32) -> Result<()> {
        self.record(BackendCall::TerminateGroup(pid));

        let sender = self.inner.lock().unwrap().running.remove(&pid);
        match sender {
            Some(tx) => {
                let _ = tx.send(ChildExit {
                    success: false,
                    code: None,
                });
                Ok(())
            }
            None => Err(anyhow!("ESRCH: no such process group {pid}")),
        }
    }
}
