#![allow(dead_code)]

use std::path::PathBuf;

use filesettle::cli::CliArgs;
use filesettle::config::{ConfigFile, RawConfigFile};

/// Builder for `RawConfigFile` to simplify test setup.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.watch.root = root.into();
        self
    }

    pub fn ext(mut self, suffix: &str) -> Self {
        self.config.watch.extensions.push(suffix.to_string());
        self
    }

    pub fn quiet_window(mut self, window: &str) -> Self {
        self.config.watch.quiet_window = window.to_string();
        self
    }

    pub fn stock(mut self, val: bool) -> Self {
        self.config.watch.stock = val;
        self
    }

    pub fn cmd(mut self, argv: &[&str]) -> Self {
        self.config.consumer.cmd = Some(argv.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn delete_after(mut self, val: bool) -> Self {
        self.config.consumer.delete_after = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse CLI args the way `main` would, without the program name.
pub fn cli_args(args: &[&str]) -> CliArgs {
    use clap::Parser;
    let argv = std::iter::once("filesettle").chain(args.iter().copied());
    CliArgs::parse_from(argv)
}
