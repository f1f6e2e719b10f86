// src/debounce/sink.rs

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::types::SettledFile;

/// Outcome of handing a settlement to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Shutdown was requested before the consumer took the file.
    Abandoned,
    /// The consumer side of the channel is gone.
    Closed,
}

/// Sending half of the single-slot settlement hand-off.
///
/// The channel holds at most one undelivered settlement, so a slow consumer
/// makes each countdown task wait in [`SettlementSink::deliver`] instead of
/// piling files up in memory.
#[derive(Debug, Clone)]
pub struct SettlementSink {
    tx: mpsc::Sender<SettledFile>,
}

/// Create a connected sink / receiver pair.
pub fn settlement_channel() -> (SettlementSink, mpsc::Receiver<SettledFile>) {
    let (tx, rx) = mpsc::channel(1);
    (SettlementSink { tx }, rx)
}

impl SettlementSink {
    /// Block until the consumer accepts `file` or `shutdown` fires.
    pub async fn deliver(&self, file: SettledFile, shutdown: &CancellationToken) -> Delivery {
        let path = file.path.clone();
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                warn!(path = ?path, "shutdown requested; settlement not delivered");
                Delivery::Abandoned
            }

            res = self.tx.send(file) => match res {
                Ok(()) => Delivery::Delivered,
                Err(mpsc::error::SendError(_)) => {
                    debug!(path = ?path, "settlement receiver closed; dropping");
                    Delivery::Closed
                }
            },
        }
    }
}
