// src/config/validate.rs

use std::path::{Component, Path};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{GoreloadError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = GoreloadError;

    fn try_from(mut raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        normalize(&mut raw);
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.build, raw.run, raw.watch))
    }
}

/// Accept `.go` as well as `go`, and trim stray whitespace.
fn normalize(cfg: &mut RawConfigFile) {
    let ext = cfg.build.source_extension.trim();
    cfg.build.source_extension = ext.strip_prefix('.').unwrap_or(ext).to_string();
    cfg.build.manifest = cfg.build.manifest.trim().to_string();
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_build_section(cfg)?;
    validate_commands(cfg)?;
    validate_excludes(cfg)?;
    Ok(())
}

fn validate_build_section(cfg: &RawConfigFile) -> Result<()> {
    let ext = &cfg.build.source_extension;
    if ext.is_empty() || ext.contains(['/', '.']) {
        return Err(GoreloadError::Config(format!(
            "[build].source_extension must be a plain extension like \"go\" (got {:?})",
            ext
        )));
    }

    let manifest = Path::new(&cfg.build.manifest);
    let plain_name = matches!(
        manifest.components().collect::<Vec<_>>().as_slice(),
        [Component::Normal(_)]
    );
    if !plain_name {
        return Err(GoreloadError::Config(format!(
            "[build].manifest must be a file name in the workspace root (got {:?})",
            cfg.build.manifest
        )));
    }

    Ok(())
}

fn validate_commands(cfg: &RawConfigFile) -> Result<()> {
    let blank = |cmd: &Option<String>| cmd.as_deref().is_some_and(|c| c.trim().is_empty());

    if blank(&cfg.build.command) {
        return Err(GoreloadError::Config(
            "[build].command must not be empty; remove it to use the default".to_string(),
        ));
    }
    if blank(&cfg.run.command) {
        return Err(GoreloadError::Config(
            "[run].command must not be empty; remove it to run nothing".to_string(),
        ));
    }
    Ok(())
}

fn validate_excludes(cfg: &RawConfigFile) -> Result<()> {
    for entry in cfg.watch.exclude.iter() {
        let path = Path::new(entry);
        let relative = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if entry.trim().is_empty() || !relative {
            return Err(GoreloadError::Config(format!(
                "[watch].exclude entries must be relative paths inside the workspace (got {:?})",
                entry
            )));
        }
    }
    Ok(())
}
