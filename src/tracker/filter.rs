//! Project-boundary rules for tracked paths.

use std::path::{Component, Path};

use crate::config::{TrackingConfig, DEFAULT_DOC_FILENAME, DEFAULT_STATE_DIR};

/// Decides whether a resolved path belongs in the dirty-file log.
#[derive(Debug, Clone, Copy)]
pub struct PathFilter<'a> {
    project_root: &'a Path,
    state_dir: &'a str,
    doc_filename: &'a str,
}

impl<'a> PathFilter<'a> {
    pub fn new(project_root: &'a Path, tracking: &'a TrackingConfig) -> Self {
        Self {
            project_root,
            state_dir: &tracking.state_dir,
            doc_filename: &tracking.doc_filename,
        }
    }

    /// Filter with the built-in reserved names.
    pub fn with_defaults(project_root: &'a Path) -> Self {
        Self {
            project_root,
            state_dir: DEFAULT_STATE_DIR,
            doc_filename: DEFAULT_DOC_FILENAME,
        }
    }

    pub fn should_track(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(self.project_root) else {
            return false;
        };

        // Hook state lives here; tracking it would feed the log into itself.
        if let Some(Component::Normal(first)) = relative.components().next() {
            if first == self.state_dir {
                return false;
            }
        }

        // Doc files are what the batch step rewrites.
        if path
            .file_name()
            .is_some_and(|name| name == self.doc_filename)
        {
            return false;
        }

        true
    }
}

/// [`PathFilter::should_track`] with the built-in reserved names.
pub fn should_track(path: &Path, project_root: &Path) -> bool {
    PathFilter::with_defaults(project_root).should_track(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/work/project";

    fn check(path: &str) -> bool {
        should_track(Path::new(path), Path::new(ROOT))
    }

    #[test]
    fn test_accepts_project_files() {
        assert!(check("/work/project/src/main.rs"));
        assert!(check("/work/project/README.md"));
    }

    #[test]
    fn test_rejects_outside_root() {
        assert!(!check("/work/other/src/main.rs"));
        assert!(!check("/work/project-two/a.txt"));
        assert!(!check("/etc/passwd"));
    }

    #[test]
    fn test_rejects_state_dir() {
        assert!(!check("/work/project/.claude/.dirty-files"));
        assert!(!check("/work/project/.claude/settings.json"));
    }

    #[test]
    fn test_nested_state_dir_name_is_allowed() {
        assert!(check("/work/project/sub/.claude/notes.md"));
    }

    #[test]
    fn test_rejects_doc_filename_at_any_depth() {
        assert!(!check("/work/project/CLAUDE.md"));
        assert!(!check("/work/project/docs/CLAUDE.md"));
        assert!(!check("/work/project/a/b/c/CLAUDE.md"));
        assert!(check("/work/project/docs/CLAUDE.md.bak"));
    }

    #[test]
    fn test_custom_names() {
        let tracking = TrackingConfig {
            state_dir: ".state".to_string(),
            doc_filename: "AGENTS.md".to_string(),
            ..TrackingConfig::default()
        };
        let root = Path::new(ROOT);
        let filter = PathFilter::new(root, &tracking);

        assert!(!filter.should_track(Path::new("/work/project/.state/log")));
        assert!(!filter.should_track(Path::new("/work/project/x/AGENTS.md")));
        assert!(filter.should_track(Path::new("/work/project/.claude/x")));
        assert!(filter.should_track(Path::new("/work/project/CLAUDE.md")));
    }
}
