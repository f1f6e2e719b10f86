// src/exec/consumer_loop.rs

//! Loop that takes settled files off the sink one at a time.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::types::SettledFile;

use super::backend::{ConsumerBackend, Outcome};

/// Hand every settlement from `rx` to `backend` until shutdown or until the
/// sink is closed. Returns how many files were processed successfully.
///
/// A consumer run in progress when shutdown fires is dropped, which kills a
/// spawned child process.
pub async fn run_consumer<C: ConsumerBackend>(
    mut rx: mpsc::Receiver<SettledFile>,
    mut backend: C,
    shutdown: CancellationToken,
) -> usize {
    info!("consumer started");
    let mut processed = 0;

    loop {
        let file = tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,

            maybe_file = rx.recv() => match maybe_file {
                Some(file) => file,
                None => {
                    debug!("settlement channel closed");
                    break;
                }
            },
        };

        debug!(path = ?file.path, root = ?file.root, "consumer received settled file");
        let path = file.path.clone();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                warn!(path = ?path, "shutdown during consumer run; abandoning");
                break;
            }

            res = backend.consume(file) => match res {
                Ok(Outcome::Processed) => processed += 1,
                Ok(Outcome::Missing) => {}
                Ok(Outcome::Failed(code)) => {
                    debug!(path = ?path, exit_code = code, "consumer reported failure");
                }
                Err(err) => error!(path = ?path, error = %err, "consumer error"),
            },
        }
    }

    info!(processed, "consumer stopped");
    processed
}

/// Spawn [`run_consumer`] on the current runtime.
pub fn spawn_consumer<C>(
    rx: mpsc::Receiver<SettledFile>,
    backend: C,
    shutdown: CancellationToken,
) -> JoinHandle<usize>
where
    C: ConsumerBackend + 'static,
{
    tokio::spawn(run_consumer(rx, backend, shutdown))
}
