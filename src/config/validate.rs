// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ReloadError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ReloadError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.paths, raw.plugin))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_paths(cfg)?;
    validate_paths(cfg)?;
    validate_companion_file(cfg)?;
    Ok(())
}

fn ensure_has_paths(cfg: &RawConfigFile) -> Result<()> {
    if cfg.paths.is_empty() {
        return Err(ReloadError::ConfigError(
            "config must list at least one entry in `paths`".to_string(),
        ));
    }
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    for (idx, path) in cfg.paths.as_slice().iter().enumerate() {
        if path.trim().is_empty() {
            return Err(ReloadError::ConfigError(format!(
                "`paths[{idx}]` is empty"
            )));
        }
    }
    Ok(())
}

fn validate_companion_file(cfg: &RawConfigFile) -> Result<()> {
    // Negative delays are accepted; they clamp to zero.
    if let Some(path) = &cfg.plugin.tailwind_directive_path {
        if path.as_os_str().is_empty() {
            return Err(ReloadError::ConfigError(
                "`tailwind_directive_path` must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
