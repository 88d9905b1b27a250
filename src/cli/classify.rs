//! Show what the hook would record for a shell command.

use std::path::Path;

use crate::config::Config;
use crate::error::Error;
use crate::tracker::{paths, CommandClassifier, PathFilter};

/// Print the command shape and each candidate path with its verdict.
pub fn run(command: &str, project_root: &Path) -> Result<(), Error> {
    let root = paths::resolve_lenient(project_root);
    let config = Config::load(&root)?;

    for line in report(command, &root, &config) {
        println!("{}", line);
    }
    Ok(())
}

/// Lines printed by [`run`]: `shape: <shape>`, then one `<verdict>\t<path>`
/// per candidate, or `nothing to track`.
pub fn report(command: &str, project_root: &Path, config: &Config) -> Vec<String> {
    let root = paths::resolve_lenient(project_root);
    let classifier =
        CommandClassifier::new(config.tracking.extra_read_only_prefixes.iter().cloned());
    let filter = PathFilter::new(&root, &config.tracking);

    let classification = classifier.classify(command, &root);
    let mut lines = vec![format!("shape: {}", classification.shape)];

    if classification.paths.is_empty() {
        lines.push("nothing to track".to_string());
    }
    for path in &classification.paths {
        let verdict = if filter.should_track(path) {
            "track"
        } else {
            "ignore"
        };
        lines.push(format!("{}\t{}", verdict, path.display()));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn project() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        (temp, root)
    }

    #[test]
    fn test_report_rm() {
        let (_temp, root) = project();

        let lines = report("rm a.txt .claude/.dirty-files", &root, &Config::default());

        assert_eq!(
            lines,
            vec![
                "shape: remove".to_string(),
                format!("track\t{}", root.join("a.txt").display()),
                format!("ignore\t{}", root.join(".claude/.dirty-files").display()),
            ]
        );
    }

    #[test]
    fn test_report_doc_file_ignored() {
        let (_temp, root) = project();

        let lines = report("mv docs/CLAUDE.md notes.md", &root, &Config::default());

        assert_eq!(
            lines,
            vec![
                "shape: move".to_string(),
                format!("ignore\t{}", root.join("docs/CLAUDE.md").display()),
            ]
        );
    }

    #[test]
    fn test_report_read_only() {
        let (_temp, root) = project();

        assert_eq!(
            report("ls -la", &root, &Config::default()),
            vec!["shape: read-only", "nothing to track"]
        );
        assert_eq!(
            report("touch a.txt", &root, &Config::default()),
            vec!["shape: unknown", "nothing to track"]
        );
    }

    #[test]
    fn test_report_uses_given_config() {
        let (_temp, root) = project();
        let mut config = Config::default();
        config.tracking.extra_read_only_prefixes = vec!["rm -i ".to_string()];

        assert_eq!(
            report("rm -i a.txt", &root, &config),
            vec!["shape: read-only", "nothing to track"]
        );
    }
}
