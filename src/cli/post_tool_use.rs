//! PostToolUse hook entry point.
//!
//! Fires after Edit, Write, MultiEdit or Bash. Reads the tool payload from
//! stdin and appends changed paths to the dirty-file log. Produces no output
//! and always succeeds: tracking is best-effort and must never get in the
//! way of the tool it observes.

use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{self, Config};
use crate::error::Error;
use crate::storage::{DirtyFileLog, DirtyFileSink};
use crate::tracker::{paths, CommandClassifier, PathFilter, ToolInvocation};

/// Run the hook against the process's stdin and environment.
pub fn run() {
    // A panic message on stderr would be surfaced to the user.
    panic::set_hook(Box::new(|_| {}));

    let mut stdin = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut stdin) {
        debug!(error = %e, "Failed to read hook payload");
        return;
    }

    run_with(&stdin, &config::project_root());
}

/// Track one payload, swallowing every failure.
pub fn run_with(stdin: &str, project_root: &Path) {
    match panic::catch_unwind(AssertUnwindSafe(|| track(stdin, project_root))) {
        Ok(Ok(tracked)) => debug!(count = tracked.len(), "Hook finished"),
        Ok(Err(e)) => debug!(error = %e, "Tracking failed, ignoring"),
        Err(_) => debug!("Tracking panicked, ignoring"),
    }
}

/// Record the paths a tool invocation changed. Returns what was appended.
pub fn track(stdin: &str, project_root: &Path) -> Result<Vec<PathBuf>, Error> {
    track_using(stdin, project_root, Config::global_path().as_deref())
}

/// [`track`] with an explicit global config location (`None` skips it).
pub fn track_using(
    stdin: &str,
    project_root: &Path,
    global_config: Option<&Path>,
) -> Result<Vec<PathBuf>, Error> {
    let invocation = ToolInvocation::parse(stdin).unwrap_or_else(|e| {
        debug!(error = %e, "Malformed hook payload, treating as empty");
        ToolInvocation::default()
    });

    let root = paths::resolve_lenient(project_root);
    let config = Config::load_with_global(&root, global_config).unwrap_or_else(|e| {
        debug!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });

    let classifier =
        CommandClassifier::new(config.tracking.extra_read_only_prefixes.iter().cloned());
    let filter = PathFilter::new(&root, &config.tracking);

    let tracked: Vec<PathBuf> = invocation
        .candidates(&classifier, &root)
        .into_iter()
        .filter(|path| filter.should_track(path))
        .collect();

    if tracked.is_empty() {
        return Ok(tracked);
    }

    DirtyFileLog::for_project(&root, &config).append(&tracked)?;
    Ok(tracked)
}
