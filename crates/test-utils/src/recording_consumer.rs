use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use filesettle::errors::Result;
use filesettle::exec::{ConsumerBackend, Outcome};
use filesettle::types::SettledFile;

/// A consumer that records which files it was handed and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct RecordingConsumer {
    consumed: Arc<Mutex<Vec<SettledFile>>>,
}

impl RecordingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consumed(&self) -> Vec<SettledFile> {
        self.consumed.lock().unwrap().clone()
    }
}

impl ConsumerBackend for RecordingConsumer {
    fn consume(
        &mut self,
        file: SettledFile,
    ) -> Pin<Box<dyn Future<Output = Result<Outcome>> + Send + '_>> {
        let consumed = Arc::clone(&self.consumed);
        Box::pin(async move {
            consumed.lock().unwrap().push(file);
            Ok(Outcome::Processed)
        })
    }
}
