// src/config/mod.rs

//! Configuration loading and validation for filesettle.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and layer CLI flags on top (`loader.rs`).
//! - Validate it into a ready-to-use [`ConfigFile`] (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{apply_cli_overrides, load_and_validate, load_from_path, resolve};
pub use model::{
    ConfigFile, ConsumerConfig, ConsumerSection, LogSection, RawConfigFile, WatchConfig,
    WatchSection,
};
