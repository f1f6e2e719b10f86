// src/watch/tree.rs

//! Directory Tree Tracker: keeps one watch per live directory under the root.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::{walk_dirs, EntryKind, FileSystem};
use crate::types::OpKind;

use super::backend::WatchBackend;

/// How an incoming event path should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    Directory,
    File,
}

/// Registration table of watched directories on top of a [`WatchBackend`].
#[derive(Debug)]
pub struct DirectoryTree<B: WatchBackend> {
    backend: B,
    fs: Arc<dyn FileSystem>,
    watched: BTreeSet<PathBuf>,
}

impl<B: WatchBackend> DirectoryTree<B> {
    pub fn new(backend: B, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            backend,
            fs,
            watched: BTreeSet::new(),
        }
    }

    /// Walk `root` and register every directory in it, `root` included.
    ///
    /// Any walk or registration failure is returned; callers treat it as fatal.
    pub fn initialize(&mut self, root: &Path) -> Result<usize> {
        let dirs = walk_dirs(self.fs.as_ref(), root)?;
        for dir in dirs {
            self.backend.register(&dir)?;
            debug!(dir = ?dir, "watch registered");
            self.watched.insert(dir);
        }
        info!(root = ?root, dirs = self.watched.len(), "initial watch registration complete");
        Ok(self.watched.len())
    }

    /// Fresh status check deciding whether `path` is a directory right now.
    ///
    /// A path that is already gone counts as a file.
    pub fn classify(&self, path: &Path) -> EventClass {
        match self.fs.entry_kind(path) {
            Ok(EntryKind::Dir) => EventClass::Directory,
            Ok(_) => EventClass::File,
            Err(err) => {
                debug!(path = ?path, error = %err, "status check failed; treating as file");
                EventClass::File
            }
        }
    }

    /// React to a live event whose target is a directory.
    ///
    /// Only the directory itself is registered on create; directories already
    /// nested inside a newly created tree are not walked.
    pub fn on_directory_event(&mut self, dir: &Path, kind: OpKind) -> Result<()> {
        match kind {
            OpKind::Create => {
                if self.watched.contains(dir) {
                    debug!(dir = ?dir, "directory already watched");
                    return Ok(());
                }
                self.backend.register(dir)?;
                self.watched.insert(dir.to_path_buf());
                info!(dir = ?dir, "watching new directory");
            }
            OpKind::Remove | OpKind::Rename => {
                if !self.watched.remove(dir) {
                    debug!(dir = ?dir, kind = %kind, "directory was not watched");
                    return Ok(());
                }
                info!(dir = ?dir, kind = %kind, "dropping directory watch");
                self.backend.unregister(dir)?;
            }
            OpKind::Write | OpKind::Backlog => {}
        }
        Ok(())
    }

    /// Drop a vanished directory from the table after a remove/rename whose
    /// target could no longer be stat'ed. Returns whether it was watched.
    pub fn forget(&mut self, dir: &Path) -> bool {
        if !self.watched.remove(dir) {
            return false;
        }
        // The OS usually discards the watch with the directory.
        if let Err(err) = self.backend.unregister(dir) {
            debug!(dir = ?dir, error = %err, "unregister of vanished directory failed");
        }
        info!(dir = ?dir, "directory vanished; watch dropped");
        true
    }

    pub fn is_watched(&self, dir: &Path) -> bool {
        self.watched.contains(dir)
    }

    pub fn watched(&self) -> impl Iterator<Item = &Path> {
        self.watched.iter().map(PathBuf::as_path)
    }

    /// Unregister everything. Used on shutdown.
    pub fn release(&mut self) {
        for dir in std::mem::take(&mut self.watched) {
            if let Err(err) = self.backend.unregister(&dir) {
                debug!(dir = ?dir, error = %err, "unregister on release failed");
            }
        }
        debug!("all watches released");
    }
}
