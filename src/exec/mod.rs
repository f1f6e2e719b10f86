// src/exec/mod.rs

//! Consumer layer: what happens to a file once it has settled.
//!
//! - [`backend`] provides the `ConsumerBackend` trait and the default
//!   `PrintConsumer`, which just writes settled paths to stdout.
//! - [`command`] runs a configured command per settled file via
//!   `tokio::process::Command`, optionally deleting the file afterwards.
//! - [`consumer_loop`] pulls settlements off the sink one at a time.

pub mod backend;
pub mod command;
pub mod consumer_loop;

pub use backend::{ConsumerBackend, Outcome, PrintConsumer};
pub use command::{expand_template, CommandConsumer};
pub use consumer_loop::{run_consumer, spawn_consumer};
