// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `goreload`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "goreload",
    version,
    about = "Rebuild and restart a Go program whenever its sources change.",
    after_help = "cd into the workspace and run goreload; it builds on every save and restarts the program."
)]
pub struct CliArgs {
    /// Command to run after every successful build (executed via `sh -c`).
    #[arg(short = 'r', long = "run", value_name = "CMD")]
    pub run: Option<String>,

    /// Print diagnostic logging and wait one second before stopping the
    /// child on Ctrl-C.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Directories to skip, relative to the workspace and separated by
    /// whitespace, e.g. `-e "dir1 dir2 dir3"`.
    #[arg(short = 'e', long = "exclude", value_name = "DIRS", default_value = ".git")]
    pub exclude: String,

    /// Optional config file (TOML).
    ///
    /// Default: `goreload.toml` in the workspace, used only when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Takes precedence over `-d` and `GORELOAD_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Relaunch the run command even when the build failed.
    #[arg(long)]
    pub relaunch_on_failure: bool,

    /// Run one build (and launch) right after startup instead of waiting
    /// for the first change.
    #[arg(long)]
    pub build_on_start: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_flags() {
        let args = CliArgs::parse_from(["goreload"]);
        assert_eq!(args.exclude, ".git");
        assert!(args.run.is_none());
        assert!(!args.debug);
        assert!(!args.relaunch_on_failure);
    }

    #[test]
    fn short_flags_are_accepted() {
        let args = CliArgs::parse_from(["goreload", "-r", "./app", "-d", "-e", "vendor tmp"]);
        assert_eq!(args.run.as_deref(), Some("./app"));
        assert!(args.debug);
        assert_eq!(args.exclude, "vendor tmp");
    }
}
