// src/watch/stock.rs

//! Stock Scanner: one-time backlog of files that existed before watching.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::debounce::DebounceCoordinator;
use crate::errors::Result;
use crate::fs::{walk_files, FileSystem};

use super::filter::ExtensionFilter;

/// Walk `root` and start a backlog countdown for every matching regular file.
///
/// Entries that cannot be visited are logged and skipped. An unreadable root
/// is returned as an error; the caller decides whether that matters.
/// Returns the number of files enqueued.
pub fn scan_stock(
    fs: &dyn FileSystem,
    root: &Path,
    filter: &ExtensionFilter,
    coordinator: &DebounceCoordinator,
) -> Result<usize> {
    let report = walk_files(fs, root)?;

    for (path, reason) in &report.skipped {
        warn!(path = ?path, error = %reason, "stock scan could not visit entry");
    }

    let files: Vec<_> = report
        .files
        .into_iter()
        .filter(|p| filter.matches(p))
        .collect();

    info!(root = ?root, count = files.len(), "stock files found");
    let count = files.len();
    for file in files {
        debug!(path = ?file, "enqueueing stock file");
        coordinator.enqueue_backlog(file);
    }

    Ok(count)
}
