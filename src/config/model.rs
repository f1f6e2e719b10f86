// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::LogLevel;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// root = "/data/incoming"
/// extensions = [".mp4", ".mkv"]
/// quiet_window = "10s"
/// stock = true
///
/// [consumer]
/// cmd = ["bypy", "-s", "100M", "upload", "{path}", "{rel}"]
/// delete_after = true
///
/// [log]
/// level = "info"
/// file = "filesettle.log"
/// ```
///
/// All sections are optional; CLI flags are layered on top before
/// validation turns this into a [`ConfigFile`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub consumer: ConsumerSection,

    #[serde(default)]
    pub log: LogSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory tree to watch. Default: the current directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Path suffixes to act on. Plain suffix match, so include the dot.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// How long a file must stay untouched before it counts as settled.
    #[serde(default = "default_quiet_window")]
    pub quiet_window: String,

    /// Also surface files that already exist when watching starts.
    #[serde(default)]
    pub stock: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_quiet_window() -> String {
    "10s".to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: Vec::new(),
            quiet_window: default_quiet_window(),
            stock: false,
        }
    }
}

/// `[consumer]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsumerSection {
    /// Command (argv) run for every settled file. Without it, settled paths
    /// are printed to stdout.
    #[serde(default)]
    pub cmd: Option<Vec<String>>,

    /// Delete the file after the command exits successfully.
    #[serde(default)]
    pub delete_after: bool,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogSection {
    #[serde(default)]
    pub level: Option<LogLevel>,

    /// Append logs to this file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchConfig,
    pub consumer: ConsumerConfig,
    pub log: LogSection,
}

#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub quiet_window: Duration,
    pub stock: bool,
}

#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub cmd: Option<Vec<String>>,
    pub delete_after: bool,
}
