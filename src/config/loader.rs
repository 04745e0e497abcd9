// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{
    default_build_command, ConfigFile, DaemonConfig, RawConfigFile, DEFAULT_CONFIG_FILE,
};
use crate::errors::{GoreloadError, Result};
use crate::fs::FileSystem;
use crate::watch::ExclusionSet;

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the checked form.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs.read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(fs, &path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Config file location for a workspace: `--config` (resolved against the
/// workspace) or `goreload.toml` in it.
pub fn config_path(root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => root.join(path),
        None => root.join(DEFAULT_CONFIG_FILE),
    }
}

/// Resolve everything the daemon needs from the CLI, the optional config
/// file and the workspace at `cwd`.
///
/// - An explicit `--config` must exist; the default file is optional.
/// - The manifest marker (`go.mod` unless overridden) must exist, otherwise
///   [`GoreloadError::MissingManifest`] is returned.
/// - CLI flags take precedence over the config file.
pub fn bootstrap(args: &CliArgs, cwd: &Path, fs: &dyn FileSystem) -> Result<DaemonConfig> {
    let root = fs.canonicalize(cwd)?;

    let path = config_path(&root, args.config.as_deref());
    let file = if fs.is_file(&path) {
        debug!(path = ?path, "loading config file");
        load_and_validate(fs, &path)?
    } else if args.config.is_some() {
        return Err(GoreloadError::Config(format!(
            "config file {:?} does not exist",
            path
        )));
    } else {
        ConfigFile::try_from(RawConfigFile::default())?
    };

    let manifest = root.join(&file.build.manifest);
    if !fs.is_file(&manifest) {
        return Err(GoreloadError::MissingManifest {
            manifest: file.build.manifest.clone(),
            dir: root,
        });
    }

    let mut cfg = DaemonConfig::for_root(root);

    let mut exclusions = ExclusionSet::from_list(&cfg.root, &args.exclude);
    exclusions.extend_relative(&cfg.root, &file.watch.exclude);
    debug!(exclude = ?exclusions.paths(), "exclude list");
    cfg.exclusions = exclusions;

    cfg.source_extension = file.build.source_extension.clone();
    cfg.build_command = match file.build.command {
        Some(cmd) => cmd,
        None => default_build_command(&cfg.project_name, &cfg.source_extension),
    };
    cfg.run_command = args
        .run
        .clone()
        .filter(|cmd| !cmd.trim().is_empty())
        .or(file.run.command);
    cfg.relaunch_on_build_failure = args.relaunch_on_failure || file.build.relaunch_on_failure;
    cfg.debug = args.debug;
    cfg.build_on_start = args.build_on_start;

    Ok(cfg)
}
