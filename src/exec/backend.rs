// src/exec/backend.rs

//! Pluggable process backend.
//!
//! The rebuild pipeline and the shutdown handler talk to a `ProcessBackend`
//! instead of spawning processes and sending signals directly. Production
//! uses [`ShellBackend`]; tests provide a fake that records calls and
//! controls when children exit.

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{Context, Result};
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::Command;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of one build command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub success: bool,
    /// Exit code, `None` if the build was killed by a signal.
    pub code: Option<i32>,
    /// Everything the build wrote, stdout and stderr interleaved.
    pub output: String,
}

/// How a supervised child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildExit {
    pub success: bool,
    pub code: Option<i32>,
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {code}"),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// A child that has been started and is now running on its own.
pub struct LaunchedChild {
    pub pid: u32,
    /// Resolves when the process exits.
    pub exit: BoxFuture<'static, Result<ChildExit>>,
}

impl fmt::Debug for LaunchedChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchedChild")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

/// Trait abstracting how builds run and how the run-process is started and
/// stopped.
pub trait ProcessBackend: Send + Sync + 'static {
    /// Run `cmd` through a shell in `dir` and capture its output.
    fn build<'a>(&'a self, cmd: &'a str, dir: &'a Path) -> BoxFuture<'a, Result<BuildOutput>>;

    /// Start `cmd` through a shell in `dir` as the leader of a new process
    /// group, sharing our stdout/stderr.
    fn launch(&self, cmd: &str, dir: &Path) -> Result<LaunchedChild>;

    /// Send SIGTERM to the process group led by `pid`.
    fn terminate_group(&self, pid: u32) -> Result<()>;
}

/// Real backend: `sh -c` via `tokio::process`, signals via `nix`.
#[derive(Debug, Clone, Default)]
pub struct ShellBackend;

fn shell(cmd: &str, dir: &Path) -> Command {
    let mut c = Command::new("sh");
    c.arg("-c").arg(cmd).current_dir(dir).stdin(Stdio::null());
    c
}

impl ProcessBackend for ShellBackend {
    fn build<'a>(&'a self, cmd: &'a str, dir: &'a Path) -> BoxFuture<'a, Result<BuildOutput>> {
        Box::pin(async move {
            // Point the shell's stderr at the stdout pipe before running the
            // command, so both streams arrive in the order they were written.
            let script = format!("exec 2>&1\n{cmd}");
            let out = shell(&script, dir)
                .output()
                .await
                .with_context(|| format!("running build command '{cmd}'"))?;

            let output = String::from_utf8_lossy(&out.stdout).into_owned();

            Ok::<_, anyhow::Error>(BuildOutput {
                success: out.status.success(),
                code: out.status.code(),
                output,
            })
        })
    }

    fn launch(&self, cmd: &str, dir: &Path) -> Result<LaunchedChild> {
        let mut child = shell(cmd, dir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            // Own process group, so SIGTERM to the group also reaches
            // anything the command spawns.
            .process_group(0)
            .spawn()
            .with_context(|| format!("spawning run command '{cmd}'"))?;

        let pid = child
            .id()
            .with_context(|| format!("run command '{cmd}' exited before reporting a pid"))?;

        let exit: BoxFuture<'static, Result<ChildExit>> = Box::pin(async move {
            let status = child.wait().await.context("waiting for run command")?;
            Ok::<_, anyhow::Error>(ChildExit {
                success: status.success(),
                code: status.code(),
            })
        });

        Ok(LaunchedChild { pid, exit })
    }

    fn terminate_group(&self, pid: u32) -> Result<()> {
        let raw = i32::try_from(pid).with_context(|| format!("pid {pid} out of range"))?;
        killpg(Pid::from_raw(raw), Signal::SIGTERM)
            .with_context(|| format!("sending SIGTERM to process group {pid}"))
    }
}
