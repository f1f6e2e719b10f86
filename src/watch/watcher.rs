// src/watch/watcher.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::debounce::{DebounceCoordinator, SettlementSink};
use crate::errors::{FilesettleError, Result};
use crate::fs::FileSystem;
use crate::watch::backend::{WatchBackend, WatchStreams};
use crate::watch::dispatcher::Dispatcher;
use crate::watch::filter::ExtensionFilter;
use crate::watch::path_utils::absolutize;
use crate::watch::stock::scan_stock;
use crate::watch::tree::DirectoryTree;

/// What to watch and how long a file must stay quiet.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub root: PathBuf,
    pub filter: ExtensionFilter,
    pub quiet_window: Duration,
    /// Surface files that already exist under `root` at startup.
    pub stock: bool,
}

/// Handle for a running watcher.
///
/// The dispatcher task owns the watch backend; it stops when the shutdown
/// token fires, releasing every watch on the way out.
pub struct WatcherHandle {
    task: JoinHandle<Option<FilesettleError>>,
    coordinator: DebounceCoordinator,
    root: PathBuf,
}

impl fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl WatcherHandle {
    /// Absolute root the watch was started on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn coordinator(&self) -> &DebounceCoordinator {
        &self.coordinator
    }

    /// Wait for the dispatcher to stop and return the last runtime error it
    /// recorded, if any.
    pub async fn join(self) -> Result<Option<FilesettleError>> {
        self.task
            .await
            .map_err(|e| FilesettleError::Other(anyhow::anyhow!("dispatcher task failed: {e}")))
    }
}

/// Start watching `options.root` and spawn the dispatcher loop.
///
/// Startup order: register a watch on every existing directory (fatal on
/// failure), optionally enqueue stock files, then start consuming events.
/// Must be called from within a Tokio runtime.
pub fn spawn_watcher<B>(
    options: WatchOptions,
    backend: B,
    streams: WatchStreams,
    fs: Arc<dyn FileSystem>,
    sink: SettlementSink,
    shutdown: CancellationToken,
) -> Result<WatcherHandle>
where
    B: WatchBackend + 'static,
{
    // Canonicalize once so we have a stable base path.
    let root = fs
        .canonicalize(&options.root)
        .unwrap_or_else(|_| absolutize(&options.root));

    let coordinator =
        DebounceCoordinator::new(root.clone(), options.quiet_window, sink, shutdown.clone());

    let mut tree = DirectoryTree::new(backend, Arc::clone(&fs));
    tree.initialize(&root)?;

    if options.stock {
        if let Err(err) = scan_stock(fs.as_ref(), &root, &options.filter, &coordinator) {
            warn!(root = ?root, error = %err, "stock scan aborted");
        }
    }

    info!(
        root = ?root,
        suffixes = ?options.filter.suffixes(),
        quiet_window = ?coordinator.window(),
        "file watcher started"
    );

    let mut dispatcher = Dispatcher::new(tree, options.filter, coordinator.clone());
    let task = tokio::spawn(async move {
        dispatcher.run(streams, shutdown).await;
        dispatcher.take_last_error()
    });

    Ok(WatcherHandle {
        task,
        coordinator,
        root,
    })
}
