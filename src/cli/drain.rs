//! Hand queued dirty files to the batch step.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::error::Error;
use crate::storage::{DirtyFileLog, DirtyFileSink};
use crate::tracker::paths;

/// Print queued paths one per line, clearing the queue unless `peek`.
pub fn run(project_root: &Path, peek: bool, unique: bool) -> Result<(), Error> {
    let paths = collect(project_root, peek, unique)?;
    for path in &paths {
        println!("{}", path.display());
    }
    Ok(())
}

/// Read (and unless `peek`, clear) the project's dirty-file log.
pub fn collect(project_root: &Path, peek: bool, unique: bool) -> Result<Vec<PathBuf>, Error> {
    let root = paths::resolve_lenient(project_root);
    let config = Config::load(&root)?;
    let log = DirtyFileLog::for_project(&root, &config);

    let paths = if peek { log.pending()? } else { log.drain()? };
    info!(path = %log.path().display(), count = paths.len(), peek, "Read dirty files");

    Ok(if unique { dedup(paths) } else { paths })
}

/// Drop repeated paths, keeping the first occurrence.
pub fn dedup(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        DirtyFileLog::for_project(&root, &Config::default())
            .append(&[root.join("a.rs"), root.join("b.rs"), root.join("a.rs")])
            .unwrap();
        (temp, root)
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let paths = vec![
            PathBuf::from("/p/b"),
            PathBuf::from("/p/a"),
            PathBuf::from("/p/b"),
        ];
        assert_eq!(
            dedup(paths),
            vec![PathBuf::from("/p/b"), PathBuf::from("/p/a")]
        );
    }

    #[test]
    fn test_peek_leaves_queue() {
        let (_temp, root) = seeded();

        let first = collect(&root, true, false).unwrap();
        let second = collect(&root, true, false).unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_drain_clears_queue() {
        let (_temp, root) = seeded();

        let drained = collect(&root, false, true).unwrap();
        assert_eq!(drained, vec![root.join("a.rs"), root.join("b.rs")]);
        assert!(collect(&root, false, false).unwrap().is_empty());
    }
}
