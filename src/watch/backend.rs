// src/watch/backend.rs

//! The OS watch primitive, behind a small trait.
//!
//! The dispatcher only needs `register` / `unregister` on single directories
//! plus two streams: raw `{path, kind}` events and asynchronous errors.
//! [`NotifyBackend`] provides this on top of `notify` (one non-recursive
//! watch per directory); tests plug in a fake that records registrations.

use std::fmt;
use std::path::Path;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::errors::{FilesettleError, Result};
use crate::types::{OpKind, RawEvent};

/// Register / unregister watches on individual directories.
pub trait WatchBackend: Send {
    fn register(&mut self, dir: &Path) -> Result<()>;
    fn unregister(&mut self, dir: &Path) -> Result<()>;
}

/// Receiving ends of a backend's event and error streams.
#[derive(Debug)]
pub struct WatchStreams {
    pub events: mpsc::UnboundedReceiver<RawEvent>,
    pub errors: mpsc::UnboundedReceiver<FilesettleError>,
}

/// Sending ends matching a [`WatchStreams`].
#[derive(Debug, Clone)]
pub struct WatchSenders {
    pub events: mpsc::UnboundedSender<RawEvent>,
    pub errors: mpsc::UnboundedSender<FilesettleError>,
}

/// Create a connected pair of senders and streams.
pub fn watch_channels() -> (WatchSenders, WatchStreams) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (errors_tx, errors_rx) = mpsc::unbounded_channel();
    (
        WatchSenders {
            events: events_tx,
            errors: errors_tx,
        },
        WatchStreams {
            events: events_rx,
            errors: errors_rx,
        },
    )
}

/// `notify`-backed watch primitive.
///
/// Dropping it stops all watches.
pub struct NotifyBackend {
    inner: RecommendedWatcher,
}

impl fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyBackend").finish()
    }
}

impl NotifyBackend {
    /// Create the OS watcher. Nothing is watched until [`WatchBackend::register`]
    /// is called.
    pub fn new() -> Result<(Self, WatchStreams)> {
        let (senders, streams) = watch_channels();

        // Called synchronously on notify's own thread.
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for raw in translate(&event) {
                        if senders.events.send(raw).is_err() {
                            // Dispatcher is gone; nothing left to do.
                            return;
                        }
                    }
                }
                Err(err) => {
                    let _ = senders.errors.send(err.into());
                }
            },
            Config::default(),
        )?;

        Ok((Self { inner }, streams))
    }
}

impl WatchBackend for NotifyBackend {
    fn register(&mut self, dir: &Path) -> Result<()> {
        self.inner.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    fn unregister(&mut self, dir: &Path) -> Result<()> {
        self.inner.unwatch(dir)?;
        Ok(())
    }
}

/// Map a `notify` event onto zero or more raw events.
///
/// A rename reported with both ends becomes a `Rename` of the old path and a
/// `Create` of the new one. Access and metadata-only changes are dropped.
pub fn translate(event: &Event) -> Vec<RawEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => OpKind::Create,
        EventKind::Remove(_) => OpKind::Remove,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            return event
                .paths
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let kind = if i == 0 { OpKind::Rename } else { OpKind::Create };
                    RawEvent::new(p.clone(), kind)
                })
                .collect();
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => OpKind::Create,
        EventKind::Modify(ModifyKind::Name(_)) => OpKind::Rename,
        EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
        EventKind::Modify(_) | EventKind::Any => OpKind::Write,
        // Access and anything else notify may add later.
        _ => return Vec::new(),
    };

    event
        .paths
        .iter()
        .map(|p| RawEvent::new(p.clone(), kind))
        .collect()
}
