//! Path resolution against the project root.
//!
//! The hook runs after the tool finished, so the source of an `rm` or `mv`
//! usually no longer exists. Resolution therefore canonicalises the longest
//! existing ancestor and appends the rest lexically.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` to an absolute path, joining relative paths onto `project_root`.
pub fn resolve(path: &Path, project_root: &Path) -> PathBuf {
    if path.is_absolute() {
        resolve_lenient(path)
    } else {
        resolve_lenient(&project_root.join(path))
    }
}

/// Canonicalise as much of `path` as exists on disk.
///
/// Relative input is first made absolute against the current directory.
/// Never fails: if no ancestor can be canonicalised, the path is only
/// normalised lexically.
pub fn resolve_lenient(path: &Path) -> PathBuf {
    let absolute = make_absolute(path);
    let path = absolute.as_path();
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        if let Ok(base) = std::fs::canonicalize(ancestor) {
            let rest = path.strip_prefix(ancestor).unwrap_or_else(|_| Path::new(""));
            return push_normalized(base, rest);
        }
    }
    push_normalized(PathBuf::new(), path)
}

fn make_absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::path::absolute(path).unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

fn push_normalized(mut base: PathBuf, rest: &Path) -> PathBuf {
    for component in rest.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                base.pop();
            }
            other => base.push(other.as_os_str()),
        }
    }
    base
}
