use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Kind of filesystem operation observed for a path.
///
/// `Backlog` is not a real event; it marks files surfaced by the startup
/// stock scan so they can be told apart in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Create,
    Write,
    Remove,
    Rename,
    Backlog,
}

impl OpKind {
    /// Events that start or extend a countdown.
    pub fn is_qualifying(self) -> bool {
        matches!(self, OpKind::Create | OpKind::Write | OpKind::Backlog)
    }

    /// Events that cancel a pending countdown without emitting.
    pub fn is_cancelling(self) -> bool {
        matches!(self, OpKind::Remove | OpKind::Rename)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpKind::Create => "CREATE",
            OpKind::Write => "WRITE",
            OpKind::Remove => "REMOVE",
            OpKind::Rename => "RENAME",
            OpKind::Backlog => "BACKLOG",
        };
        f.write_str(s)
    }
}

/// A single `{path, kind}` notification from the watch primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub path: PathBuf,
    pub kind: OpKind,
}

impl RawEvent {
    pub fn new(path: impl Into<PathBuf>, kind: OpKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// A file that stayed quiet for a full window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettledFile {
    /// Absolute path of the settled file.
    pub path: PathBuf,
    /// Absolute root the watch was started on.
    pub root: PathBuf,
}

/// Log level as exposed on the CLI and in the `[log]` config section.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "invalid log level: {other} (expected error, warn, info, debug or trace)"
            )),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
