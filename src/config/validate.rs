// src/config/validate.rs

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, ConsumerConfig, RawConfigFile, WatchConfig};
use crate::errors::{FilesettleError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FilesettleError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_extensions(&raw)?;
        validate_consumer(&raw)?;
        let quiet_window = validate_quiet_window(&raw)?;

        if raw.watch.root.as_os_str().is_empty() {
            return Err(FilesettleError::ConfigError(
                "[watch].root must not be empty".to_string(),
            ));
        }

        Ok(ConfigFile {
            watch: WatchConfig {
                root: raw.watch.root,
                extensions: raw.watch.extensions,
                quiet_window,
                stock: raw.watch.stock,
            },
            consumer: ConsumerConfig {
                cmd: raw.consumer.cmd,
                delete_after: raw.consumer.delete_after,
            },
            log: raw.log,
        })
    }
}

fn validate_extensions(cfg: &RawConfigFile) -> Result<()> {
    // An empty list would silently match nothing.
    if cfg.watch.extensions.is_empty() {
        return Err(FilesettleError::ConfigError(
            "at least one suffix is required ([watch].extensions or -e)".to_string(),
        ));
    }
    // An empty suffix would match every path.
    if cfg.watch.extensions.iter().any(|s| s.is_empty()) {
        return Err(FilesettleError::ConfigError(
            "suffixes must not be empty strings".to_string(),
        ));
    }
    Ok(())
}

fn validate_quiet_window(cfg: &RawConfigFile) -> Result<std::time::Duration> {
    let window = parse_duration(&cfg.watch.quiet_window).map_err(|e| {
        FilesettleError::ConfigError(format!("[watch].quiet_window: {e}"))
    })?;
    if window.is_zero() {
        return Err(FilesettleError::ConfigError(
            "[watch].quiet_window must be greater than zero".to_string(),
        ));
    }
    Ok(window)
}

fn validate_consumer(cfg: &RawConfigFile) -> Result<()> {
    match &cfg.consumer.cmd {
        Some(cmd) if cmd.first().is_none_or(|program| program.trim().is_empty()) => {
            Err(FilesettleError::ConfigError(
                "[consumer].cmd must name a program".to_string(),
            ))
        }
        None if cfg.consumer.delete_after => Err(FilesettleError::ConfigError(
            "delete_after requires a consumer command".to_string(),
        )),
        _ => Ok(()),
    }
}
