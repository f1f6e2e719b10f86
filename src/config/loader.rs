// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Build the effective configuration for a run.
///
/// Starts from `--config` (or built-in defaults when absent), layers the CLI
/// flags on top, then validates.
pub fn resolve(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };
    apply_cli_overrides(&mut raw, args);
    ConfigFile::try_from(raw)
}

/// Overwrite file values with whatever was given on the command line.
///
/// `-e` replaces the configured suffix list rather than extending it. Boolean
/// flags can only switch a setting on.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(root) = &args.watch {
        raw.watch.root = root.clone();
    }
    if !args.ext.is_empty() {
        raw.watch.extensions = args.ext.iter().map(|s| s.trim().to_string()).collect();
    }
    if let Some(window) = &args.quiet_window {
        raw.watch.quiet_window = window.clone();
    }
    if args.stock {
        raw.watch.stock = true;
    }
    if !args.command.is_empty() {
        raw.consumer.cmd = Some(args.command.clone());
    }
    if args.delete_after {
        raw.consumer.delete_after = true;
    }
    if args.log_level.is_some() {
        raw.log.level = args.log_level;
    }
    if let Some(file) = &args.log_file {
        raw.log.file = Some(file.clone());
    }
}
