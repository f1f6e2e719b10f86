// src/exec/backend.rs

//! Pluggable consumer backend abstraction.
//!
//! The consumer loop talks to a `ConsumerBackend` instead of running commands
//! directly. This makes it easy to swap in a recording consumer in tests while
//! keeping the production implementations here and in [`super::command`].

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::types::SettledFile;

/// What a consumer did with a settled file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was handed on successfully.
    Processed,
    /// The file no longer existed when the consumer looked at it.
    Missing,
    /// The consumer ran but reported failure (exit code, `-1` if killed).
    Failed(i32),
}

/// Trait abstracting what is done with each settled file.
pub trait ConsumerBackend: Send {
    /// Handle one settled file. Errors are logged by the caller and never
    /// stop the consumer loop.
    fn consume(
        &mut self,
        file: SettledFile,
    ) -> Pin<Box<dyn Future<Output = Result<Outcome>> + Send + '_>>;
}

/// Writes each settled path to stdout, one per line.
#[derive(Debug, Clone, Default)]
pub struct PrintConsumer;

impl ConsumerBackend for PrintConsumer {
    fn consume(
        &mut self,
        file: SettledFile,
    ) -> Pin<Box<dyn Future<Output = Result<Outcome>> + Send + '_>> {
        Box::pin(async move {
            println!("{}", file.path.display());
            Ok(Outcome::Processed)
        })
    }
}
