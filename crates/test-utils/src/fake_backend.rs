use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use filesettle::errors::{FilesettleError, Result};
use filesettle::watch::WatchBackend;

#[derive(Debug, Default)]
struct State {
    registered: Vec<PathBuf>,
    unregistered: Vec<PathBuf>,
    refuse: HashSet<PathBuf>,
}

/// A watch backend that:
/// - records every register / unregister call
/// - fails registration for paths marked with [`FakeBackend::refuse`].
///
/// Clones share state, so a test can keep one handle after moving another
/// into a `DirectoryTree`.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refuse(&self, dir: impl AsRef<Path>) {
        self.state
            .lock()
            .unwrap()
            .refuse
            .insert(dir.as_ref().to_path_buf());
    }

    pub fn registered(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().registered.clone()
    }

    pub fn unregistered(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().unregistered.clone()
    }
}

impl WatchBackend for FakeBackend {
    fn register(&mut self, dir: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.refuse.contains(dir) {
            return Err(FilesettleError::IoError(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("refusing to watch {}", dir.display()),
            )));
        }
        state.registered.push(dir.to_path_buf());
        Ok(())
    }

    fn unregister(&mut self, dir: &Path) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .unregistered
            .push(dir.to_path_buf());
        Ok(())
    }
}
