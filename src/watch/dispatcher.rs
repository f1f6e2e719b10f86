// src/watch/dispatcher.rs

//! The single cooperative event loop.
//!
//! Pulls raw events and errors from the watch primitive, keeps the directory
//! table in sync, filters file events by suffix and feeds the survivors into
//! the [`DebounceCoordinator`]. Runtime errors never stop the loop; the most
//! recent one is kept for inspection.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::debounce::DebounceCoordinator;
use crate::errors::FilesettleError;
use crate::types::RawEvent;

use super::backend::{WatchBackend, WatchStreams};
use super::filter::ExtensionFilter;
use super::tree::{DirectoryTree, EventClass};

#[derive(Debug)]
pub struct Dispatcher<B: WatchBackend> {
    tree: DirectoryTree<B>,
    filter: ExtensionFilter,
    coordinator: DebounceCoordinator,
    last_error: Option<FilesettleError>,
}

impl<B: WatchBackend> Dispatcher<B> {
    pub fn new(
        tree: DirectoryTree<B>,
        filter: ExtensionFilter,
        coordinator: DebounceCoordinator,
    ) -> Self {
        Self {
            tree,
            filter,
            coordinator,
            last_error: None,
        }
    }

    /// Run until `shutdown` fires or the event stream closes, then release
    /// every watch.
    pub async fn run(&mut self, mut streams: WatchStreams, shutdown: CancellationToken) {
        info!("dispatcher started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("shutdown requested; dispatcher stopping");
                    break;
                }

                maybe_event = streams.events.recv() => match maybe_event {
                    Some(event) => self.handle_event(event),
                    None => {
                        info!("watch event stream closed; dispatcher stopping");
                        break;
                    }
                },

                Some(err) = streams.errors.recv() => self.record_error(err),
            }
        }

        self.tree.release();
    }

    /// Classify and route one raw event.
    pub fn handle_event(&mut self, event: RawEvent) {
        let RawEvent { path, kind } = event;
        debug!(path = ?path, kind = %kind, "filesystem event");

        match self.tree.classify(&path) {
            EventClass::Directory => {
                if let Err(err) = self.tree.on_directory_event(&path, kind) {
                    self.record_error(err);
                }
            }
            EventClass::File => {
                if kind.is_cancelling() && self.tree.forget(&path) {
                    return;
                }
                if !self.filter.matches(&path) {
                    trace!(path = ?path, "ignored by suffix filter");
                    return;
                }
                self.coordinator.observe(path, kind);
            }
        }
    }

    /// Log a non-fatal error and keep it as the last error.
    pub fn record_error(&mut self, err: FilesettleError) {
        warn!(error = %err, "watch error");
        self.last_error = Some(err);
    }

    pub fn last_error(&self) -> Option<&FilesettleError> {
        self.last_error.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<FilesettleError> {
        self.last_error.take()
    }

    pub fn tree(&self) -> &DirectoryTree<B> {
        &self.tree
    }

    pub fn coordinator(&self) -> &DebounceCoordinator {
        &self.coordinator
    }
}
