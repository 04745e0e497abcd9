// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::watch::ExclusionSet;

/// Default config file name, looked up in the workspace root.
pub const DEFAULT_CONFIG_FILE: &str = "goreload.toml";
pub const DEFAULT_MANIFEST: &str = "go.mod";
pub const DEFAULT_SOURCE_EXTENSION: &str = "go";

/// Optional `goreload.toml` as read from disk, before validation.
///
/// ```toml
/// [build]
/// command = "go build -o app ./cmd/app"
/// source_extension = "go"
/// manifest = "go.mod"
/// relaunch_on_failure = false
///
/// [run]
/// command = "./app --port 8080"
///
/// [watch]
/// exclude = ["vendor", "tmp"]
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub run: RunSection,
    #[serde(default)]
    pub watch: WatchSection,
}

/// Validated config file. Construct through `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub build: BuildSection,
    pub run: RunSection,
    pub watch: WatchSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(build: BuildSection, run: RunSection, watch: WatchSection) -> Self {
        Self { build, run, watch }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Full build command; replaces the derived `go build` line.
    #[serde(default)]
    pub command: Option<String>,

    /// Extension of files whose changes trigger a rebuild (no leading dot).
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// File that must exist in the workspace root.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Start the run command again even when the build failed.
    #[serde(default)]
    pub relaunch_on_failure: bool,
}

fn default_source_extension() -> String {
    DEFAULT_SOURCE_EXTENSION.to_string()
}

fn default_manifest() -> String {
    DEFAULT_MANIFEST.to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            command: None,
            source_extension: default_source_extension(),
            manifest: default_manifest(),
            relaunch_on_failure: false,
        }
    }
}

/// `[run]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Used when `-r` is not given on the command line.
    #[serde(default)]
    pub command: Option<String>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Extra directories to skip, relative to the workspace root. Appended
    /// to the `-e` list.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Everything the daemon needs at runtime, resolved once at startup.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Absolute workspace root.
    pub root: PathBuf,
    /// Final component of `root`; the default build output name.
    pub project_name: String,
    pub exclusions: ExclusionSet,
    pub build_command: String,
    pub run_command: Option<String>,
    pub source_extension: String,
    pub relaunch_on_build_failure: bool,
    pub debug: bool,
    pub build_on_start: bool,
}

impl DaemonConfig {
    /// Defaults for a Go workspace at `root`: `go build -o <dir-name> *.go`,
    /// `.git` excluded, no run command.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let project_name = project_name(&root);
        let build_command = default_build_command(&project_name, DEFAULT_SOURCE_EXTENSION);
        let exclusions = ExclusionSet::from_list(&root, ".git");

        Self {
            root,
            project_name,
            exclusions,
            build_command,
            run_command: None,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            relaunch_on_build_failure: false,
            debug: false,
            build_on_start: false,
        }
    }

    /// True if a change to `path` should trigger a rebuild.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == self.source_extension.as_str())
    }
}

/// `go build -o <name> *.<ext>`
pub fn default_build_command(project_name: &str, source_extension: &str) -> String {
    format!("go build -o {project_name} *.{source_extension}")
}

fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string())
}
