// src/logging.rs

//! Logging setup for `filesettle` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag or `[log].level` (already merged in the config)
//! 2. `FILESETTLE_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs go to STDERR so stdout can carry settled paths, or are appended to a
//! log file when one is configured.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::types::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(level: Option<LogLevel>, log_file: Option<&Path>) -> Result<()> {
    let level = resolve_level(level, std::env::var("FILESETTLE_LOG").ok().as_deref());

    match log_file {
        Some(path) => file_subscriber(level, path)?.init(),
        None => fmt()
            .with_max_level(level)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init(),
    }

    Ok(())
}

/// Subscriber appending plain-text lines to `path`, creating it if needed.
fn file_subscriber(
    level: Level,
    path: &Path,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {:?}", path))?;

    Ok(fmt()
        .with_max_level(level)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish())
}

fn resolve_level(explicit: Option<LogLevel>, env: Option<&str>) -> Level {
    explicit
        .or_else(|| env.and_then(|s| s.parse::<LogLevel>().ok()))
        .map(Level::from)
        .unwrap_or(Level::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_wins_over_env() {
        assert_eq!(
            resolve_level(Some(LogLevel::Debug), Some("error")),
            tracing::Level::DEBUG
        );
    }

    #[test]
    fn env_level_is_used_when_no_flag() {
        assert_eq!(resolve_level(None, Some("warning")), tracing::Level::WARN);
    }

    #[test]
    fn garbage_env_falls_back_to_info() {
        assert_eq!(resolve_level(None, Some("loud")), tracing::Level::INFO);
        assert_eq!(resolve_level(None, None), tracing::Level::INFO);
    }

    #[test]
    fn log_file_is_appended_not_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filesettle.log");

        let first = file_subscriber(Level::INFO, &path).unwrap();
        tracing::subscriber::with_default(first, || {
            tracing::info!(run = 1, "first run");
            tracing::debug!("filtered out");
        });

        let second = file_subscriber(Level::INFO, &path).unwrap();
        tracing::subscriber::with_default(second, || tracing::info!(run = 2, "second run"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let first_at = contents.find("first run").expect("first run kept");
        let second_at = contents.find("second run").expect("second run written");
        assert!(first_at < second_at);
        assert!(!contents.contains("filtered out"));
        assert!(!contents.contains('\u{1b}'), "no ANSI escapes in log file");
    }
}
