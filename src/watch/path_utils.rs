// src/watch/path_utils.rs

//! Path helpers shared by the watcher and the consumer.

use std::path::{Path, PathBuf};

/// Express `path` relative to `root`, with forward slashes.
///
/// Falls back to comparing canonicalized paths when the plain prefix check
/// fails (symlinked roots, `/private/var` vs `/var` on macOS). Returns `None`
/// if `path` is not under `root` at all, or is `root` itself.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Some(rel) = strip_root(root, path) {
        return Some(rel);
    }

    let (root_canon, path_canon) = (root.canonicalize().ok()?, path.canonicalize().ok()?);
    strip_root(&root_canon, &path_canon)
}

fn strip_root(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    Some(rel.to_string_lossy().replace('\\', "/"))
}

/// Make `path` absolute without touching the filesystem.
pub fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_path_is_relativized_with_forward_slashes() {
        let rel = relative_str(Path::new("/data/in"), Path::new("/data/in/sub/a.dat"));
        assert_eq!(rel.as_deref(), Some("sub/a.dat"));
    }

    #[test]
    fn root_itself_has_no_relative_form() {
        assert_eq!(relative_str(Path::new("/data/in"), Path::new("/data/in")), None);
    }

    #[test]
    fn path_outside_root_is_rejected() {
        assert_eq!(
            relative_str(Path::new("/data/in"), Path::new("/elsewhere/a.dat")),
            None
        );
    }

    #[test]
    fn absolutize_keeps_absolute_paths() {
        let p = Path::new("/data/in/a.dat");
        assert_eq!(absolutize(p), PathBuf::from("/data/in/a.dat"));
        assert!(absolutize(Path::new("a.dat")).is_absolute());
    }
}
