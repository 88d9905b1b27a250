//! Dirty-file log: an append-only queue of changed paths.
//!
//! The hook appends; a separate batch step drains at turn end. The file
//! lives at `<project>/.claude/.dirty-files` by default, one absolute path
//! per line, with no deduplication.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::Error;

/// Queue of dirty paths shared between the hook and its consumer.
pub trait DirtyFileSink {
    /// Append paths in order. Each path becomes one line.
    fn append(&self, paths: &[PathBuf]) -> Result<(), Error>;

    /// Read everything queued without clearing it.
    fn pending(&self) -> Result<Vec<PathBuf>, Error>;

    /// Take everything queued, leaving the queue empty.
    fn drain(&self) -> Result<Vec<PathBuf>, Error>;
}

/// File-backed [`DirtyFileSink`].
#[derive(Debug, Clone)]
pub struct DirtyFileLog {
    path: PathBuf,
}

impl DirtyFileLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Log for a project, at the location named by `config`.
    pub fn for_project(project_root: &Path, config: &Config) -> Self {
        Self::new(config.dirty_file_path(project_root))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn draining_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".draining");
        self.path.with_file_name(name)
    }
}

impl DirtyFileSink for DirtyFileLog {
    fn append(&self, paths: &[PathBuf]) -> Result<(), Error> {
        if paths.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // One write per line so concurrent appenders never split a line.
        for path in paths {
            let line = format!("{}\n", path.display());
            file.write_all(line.as_bytes())?;
        }

        debug!(path = %self.path.display(), count = paths.len(), "Appended dirty files");
        Ok(())
    }

    fn pending(&self) -> Result<Vec<PathBuf>, Error> {
        read_lines(&self.path)
    }

    fn drain(&self) -> Result<Vec<PathBuf>, Error> {
        let draining = self.draining_path();

        // Leftovers from an interrupted drain come first.
        let mut paths = read_lines(&draining)?;

        match fs::rename(&self.path, &draining) {
            Ok(()) => paths.extend(read_lines(&draining)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        match fs::remove_file(&draining) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!(path = %self.path.display(), count = paths.len(), "Drained dirty files");
        Ok(paths)
    }
}

/// Lines of a log file; a missing file reads as empty.
fn read_lines(path: &Path) -> Result<Vec<PathBuf>, Error> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_lines(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

fn parse_lines(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
