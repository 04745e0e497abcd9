#![allow(dead_code)]

use std::path::PathBuf;

use goreload::config::DaemonConfig;
use goreload::watch::ExclusionSet;

/// Builder for `DaemonConfig` to simplify test setup.
///
/// Starts from the Go defaults for the given root (`go build -o <name>
/// *.go`, `.git` excluded, no run command).
pub struct DaemonConfigBuilder {
    config: DaemonConfig,
}

impl DaemonConfigBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: DaemonConfig::for_root(root),
        }
    }

    pub fn run(mut self, cmd: &str) -> Self {
        self.config.run_command = Some(cmd.to_string());
        self
    }

    pub fn build_command(mut self, cmd: &str) -> Self {
        self.config.build_command = cmd.to_string();
        self
    }

    /// Replace the exclusion list (whitespace-separated, relative to root).
    pub fn exclude(mut self, list: &str) -> Self {
        self.config.exclusions = ExclusionSet::from_list(&self.config.root, list);
        self
    }

    pub fn source_extension(mut self, ext: &str) -> Self {
        self.config.source_extension = ext.to_string();
        self
    }

    pub fn relaunch_on_build_failure(mut self, val: bool) -> Self {
        self.config.relaunch_on_build_failure = val;
        self
    }

    pub fn debug(mut self, val: bool) -> Self {
        self.config.debug = val;
        self
    }

    pub fn build(self) -> DaemonConfig {
        self.config
    }
}
