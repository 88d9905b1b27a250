//! Configuration management for doctrack.
//!
//! Looks for `<root>/.claude/doctrack.toml` first, then
//! `~/.doctrack/config.toml`, and falls back to built-in defaults.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// Environment variable naming the project root.
pub const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// Default reserved state directory (relative to project root).
pub const DEFAULT_STATE_DIR: &str = ".claude";

/// Default dirty-file log name inside the state directory.
pub const DEFAULT_DIRTY_FILE: &str = ".dirty-files";

/// Documentation file that is never tracked.
pub const DEFAULT_DOC_FILENAME: &str = "CLAUDE.md";

/// Project-level config file name, inside the default state directory.
pub const PROJECT_CONFIG_FILE: &str = "doctrack.toml";

/// doctrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub tracking: TrackingConfig,
}

/// What gets tracked and where it is recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackingConfig {
    /// Top-level directory holding hook state. Never tracked itself.
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Log file name inside `state_dir`.
    #[serde(default = "default_dirty_file")]
    pub dirty_file: String,

    /// File name excluded at any depth.
    #[serde(default = "default_doc_filename")]
    pub doc_filename: String,

    /// Additional command prefixes treated as read-only.
    #[serde(default)]
    pub extra_read_only_prefixes: Vec<String>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            dirty_file: default_dirty_file(),
            doc_filename: default_doc_filename(),
            extra_read_only_prefixes: Vec::new(),
        }
    }
}

fn default_state_dir() -> String {
    DEFAULT_STATE_DIR.to_string()
}

fn default_dirty_file() -> String {
    DEFAULT_DIRTY_FILE.to_string()
}

fn default_doc_filename() -> String {
    DEFAULT_DOC_FILENAME.to_string()
}

impl Config {
    /// Load config for a project, falling back to the global file and then defaults.
    pub fn load(project_root: &Path) -> Result<Self, Error> {
        Self::load_with_global(project_root, Self::global_path().as_deref())
    }

    /// Like [`Config::load`], with an explicit global config location (`None` skips it).
    pub fn load_with_global(
        project_root: &Path,
        global_path: Option<&Path>,
    ) -> Result<Self, Error> {
        let project_path = Self::project_path(project_root);
        if project_path.exists() {
            debug!(path = %project_path.display(), "Loading project config");
            return Self::load_from(&project_path);
        }

        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!(path = %global_path.display(), "Loading global config");
                return Self::load_from(global_path);
            }
        }

        Ok(Self::default())
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Path to the project config file.
    pub fn project_path(project_root: &Path) -> PathBuf {
        project_root
            .join(DEFAULT_STATE_DIR)
            .join(PROJECT_CONFIG_FILE)
    }

    /// Path to global doctrack directory (~/.doctrack/).
    pub fn global_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".doctrack"))
    }

    /// Path to the global config file.
    pub fn global_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Location of the dirty-file log for a project.
    pub fn dirty_file_path(&self, project_root: &Path) -> PathBuf {
        project_root
            .join(&self.tracking.state_dir)
            .join(&self.tracking.dirty_file)
    }

    fn validate(&self) -> Result<(), Error> {
        if !is_single_component(&self.tracking.state_dir) {
            return Err(Error::InvalidConfig(format!(
                "state_dir must be a single directory name, got {:?}",
                self.tracking.state_dir
            )));
        }
        if !is_single_component(&self.tracking.dirty_file) {
            return Err(Error::InvalidConfig(format!(
                "dirty_file must be a single file name, got {:?}",
                self.tracking.dirty_file
            )));
        }
        if self.tracking.doc_filename.is_empty() {
            return Err(Error::InvalidConfig("doc_filename is empty".to_string()));
        }
        Ok(())
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Project root from `CLAUDE_PROJECT_DIR`, else the current directory.
pub fn project_root() -> PathBuf {
    project_root_from(std::env::var_os(PROJECT_DIR_ENV))
}

/// Project root from an optional `CLAUDE_PROJECT_DIR` value. Unset or empty
/// falls back to the current directory.
pub fn project_root_from(value: Option<OsString>) -> PathBuf {
    match value {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
