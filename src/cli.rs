// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::Parser;

pub use crate::types::LogLevel;

/// Command-line arguments for `filesettle`.
///
/// Every flag overrides the matching value from `--config`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "filesettle",
    version,
    about = "Watch a directory tree and act on files once they stop changing.",
    long_about = None
)]
pub struct CliArgs {
    /// Optional config file (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory tree to watch (default: current directory).
    #[arg(short = 'w', long = "watch", value_name = "DIR")]
    pub watch: Option<PathBuf>,

    /// Path suffix to act on. Repeat or comma-separate for several.
    ///
    /// Plain suffix match: `log` also matches `catalog`, use `.log` for the
    /// extension only.
    #[arg(short = 'e', long = "ext", value_name = "SUFFIX", value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Quiet window before a file counts as settled (e.g. `500ms`, `10s`).
    #[arg(short = 'q', long, value_name = "DURATION")]
    pub quiet_window: Option<String>,

    /// Also process files that already exist when watching starts.
    #[arg(short = 's', long)]
    pub stock: bool,

    /// Delete each file after the consumer command succeeds.
    #[arg(long)]
    pub delete_after: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `[log].level`, then `FILESETTLE_LOG`, then `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Resolve and print the configuration, then exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Command run per settled file, after `--`. Placeholders: {path},
    /// {root}, {rel}, {name}. Without one, settled paths are printed.
    #[arg(last = true, value_name = "CMD")]
    pub command: Vec<String>,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
