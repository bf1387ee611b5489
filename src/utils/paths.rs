//! Path normalization and directory creation

use std::io;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against the current directory and resolve `.` and
/// `..` components lexically (no symlink resolution).
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let joined =
        if path.is_absolute() { path.to_path_buf() } else { std::env::current_dir()?.join(path) };
    Ok(normalize_path(&joined))
}

pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // ".." at the root stays at the root
                let leading = matches!(out.components().next_back(), Some(Component::ParentDir));
                if leading || (!out.pop() && !out.has_root()) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Create `dir` and its parents. A directory that already exists, including
/// one created concurrently by another process, is not an error.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    match std::fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}
