// src/fs/walk.rs

//! Recursive directory walks over a [`FileSystem`].
//!
//! Both walks are depth-first and visit each directory's entries in lexical
//! order. Symlinks are reported but never followed, so a link cycle cannot
//! make a walk run forever.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::errors::{FilesettleError, Result};

use super::{EntryKind, FileSystem};

/// Result of a lenient walk: what was found plus what could not be visited.
#[derive(Debug, Default)]
pub struct WalkReport {
    /// Every regular file under the root. Symlinks, sockets and other special
    /// entries are left out.
    pub files: Vec<PathBuf>,
    /// Entries that failed their status check or listing, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Strict walk: every directory under `root`, `root` first.
///
/// Any failure (root missing, unreadable subdirectory, vanished entry) aborts
/// the walk.
pub fn walk_dirs(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    ensure_dir(fs, root)?;

    let mut dirs = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = list_sorted(fs, &dir)?;
        let mut children = Vec::new();
        for entry in entries {
            let kind = fs
                .entry_kind(&entry)
                .map_err(|e| FilesettleError::walk(&entry, e))?;
            if kind == EntryKind::Dir {
                children.push(entry);
            }
        }
        dirs.push(dir);
        // Reverse so the lexically first child is popped next.
        stack.extend(children.into_iter().rev());
    }

    Ok(dirs)
}

/// Lenient walk: every regular file under `root`.
///
/// A failure on `root` itself aborts the walk; failures further down are
/// recorded in [`WalkReport::skipped`] and the walk carries on.
pub fn walk_files(fs: &dyn FileSystem, root: &Path) -> Result<WalkReport> {
    ensure_dir(fs, root)?;

    let mut report = WalkReport::default();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match list_sorted(fs, &dir) {
            Ok(entries) => entries,
            Err(err) if dir == root => return Err(err),
            Err(err) => {
                report.skipped.push((dir, err.to_string()));
                continue;
            }
        };

        let mut children = Vec::new();
        for entry in entries {
            match fs.entry_kind(&entry) {
                Ok(EntryKind::Dir) => children.push(entry),
                Ok(EntryKind::File) => report.files.push(entry),
                Ok(kind) => trace!(path = ?entry, ?kind, "not a regular file; ignored"),
                Err(err) => report.skipped.push((entry, err.to_string())),
            }
        }
        stack.extend(children.into_iter().rev());
    }

    Ok(report)
}

fn ensure_dir(fs: &dyn FileSystem, root: &Path) -> Result<()> {
    match fs.entry_kind(root) {
        Ok(EntryKind::Dir) => Ok(()),
        Ok(other) => Err(FilesettleError::walk(
            root,
            format!("not a directory ({other:?})"),
        )),
        Err(err) => Err(FilesettleError::walk(root, err)),
    }
}

fn list_sorted(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs
        .read_dir(dir)
        .map_err(|e| FilesettleError::walk(dir, e))?;
    entries.sort();
    Ok(entries)
}
