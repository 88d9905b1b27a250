//! Bash command classifier.
//!
//! Recognises the handful of command shapes that delete or rename files
//! (`rm`, `git rm`, `mv`, `git mv`, `unlink`) and pulls out the affected
//! paths. Anything it does not recognise yields nothing.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::paths;

/// Command prefixes assumed never to modify tracked files.
///
/// Matched against the raw (trimmed) command text, so a trailing space is
/// significant: `"go "` skips `go build` but not `gofmt -w`.
#[rustfmt::skip]
pub const READ_ONLY_PREFIXES: &[&str] = &[
    "ls", "cat", "echo", "grep", "find", "head", "tail", "less", "more", "cd", "pwd", "which",
    "whereis", "type", "file", "stat", "wc",
    "git status", "git log", "git diff", "git show", "git branch", "git fetch", "git pull",
    "git push", "git clone", "git checkout", "git stash", "git remote", "git tag",
    "git rev-parse",
    "npm ", "yarn ", "pnpm ", "node ", "python", "pip ", "uv ", "cargo ", "go ", "make", "cmake",
    "docker ", "kubectl ",
    "curl ", "wget ", "ssh ", "scp ", "rsync ",
];

/// Tokens that chain or redirect commands. Argument scanning stops at the first one.
pub const CONTROL_OPERATORS: &[&str] = &["&&", "||", ";", "|", ">", ">>", "<", "2>", "2>&1"];

/// Shape of a shell command, as far as file tracking is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandShape {
    /// Matches a read-only prefix.
    Skip,
    /// `rm`/`git rm`: every non-flag argument from `args_from` on.
    RemoveLike { args_from: usize },
    /// `mv`/`git mv`: the first non-flag argument from `args_from` on (the source).
    MoveLike { args_from: usize },
    /// `unlink PATH`.
    UnlinkLike,
    /// Anything else.
    Unknown,
}

impl fmt::Display for CommandShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandShape::Skip => write!(f, "read-only"),
            CommandShape::RemoveLike { .. } => write!(f, "remove"),
            CommandShape::MoveLike { .. } => write!(f, "move"),
            CommandShape::UnlinkLike => write!(f, "unlink"),
            CommandShape::Unknown => write!(f, "unknown"),
        }
    }
}

impl CommandShape {
    /// Derive the shape from the leading tokens.
    pub fn of_tokens(tokens: &[String]) -> Self {
        let words: Vec<&str> = tokens.iter().map(String::as_str).collect();
        match words.as_slice() {
            ["rm", ..] => CommandShape::RemoveLike { args_from: 1 },
            ["git", "rm", ..] => CommandShape::RemoveLike { args_from: 2 },
            ["mv", _, _, ..] => CommandShape::MoveLike { args_from: 1 },
            ["git", "mv", _, ..] => CommandShape::MoveLike { args_from: 2 },
            ["unlink", _, ..] => CommandShape::UnlinkLike,
            _ => CommandShape::Unknown,
        }
    }

    /// Raw path arguments this shape picks out of `tokens`.
    pub fn extract<'t>(&self, tokens: &'t [String]) -> Vec<&'t str> {
        match *self {
            CommandShape::Skip | CommandShape::Unknown => Vec::new(),
            CommandShape::RemoveLike { args_from } => arguments(tokens, args_from).collect(),
            CommandShape::MoveLike { args_from } => {
                arguments(tokens, args_from).take(1).collect()
            }
            CommandShape::UnlinkLike => tokens
                .get(1)
                .map(String::as_str)
                .filter(|token| !is_control_operator(token))
                .into_iter()
                .collect(),
        }
    }
}

/// Non-flag tokens from `start` up to the first control operator.
fn arguments(tokens: &[String], start: usize) -> impl Iterator<Item = &str> {
    tokens
        .iter()
        .skip(start)
        .map(String::as_str)
        .take_while(|token| !is_control_operator(token))
        .filter(|token| !token.starts_with('-'))
}

pub fn is_control_operator(token: &str) -> bool {
    CONTROL_OPERATORS.contains(&token)
}

/// Result of looking at one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub shape: CommandShape,
    pub paths: Vec<PathBuf>,
}

impl Classification {
    fn empty(shape: CommandShape) -> Self {
        Self {
            shape,
            paths: Vec::new(),
        }
    }
}

/// Classifies shell commands, with an optionally extended read-only prefix list.
#[derive(Debug, Clone, Default)]
pub struct CommandClassifier {
    extra_read_only: Vec<String>,
}

impl CommandClassifier {
    pub fn new(extra_read_only: impl IntoIterator<Item = String>) -> Self {
        Self {
            extra_read_only: extra_read_only.into_iter().collect(),
        }
    }

    pub fn is_read_only(&self, command: &str) -> bool {
        READ_ONLY_PREFIXES
            .iter()
            .any(|prefix| command.starts_with(prefix))
            || self
                .extra_read_only
                .iter()
                .any(|prefix| !prefix.is_empty() && command.starts_with(prefix.as_str()))
    }

    /// Classify `command` and resolve its path arguments against `project_root`.
    ///
    /// Returns an empty path list for read-only commands, unknown commands,
    /// and commands that fail to tokenise (unbalanced quotes).
    pub fn classify(&self, command: &str, project_root: &Path) -> Classification {
        let command = command.trim();
        if command.is_empty() {
            return Classification::empty(CommandShape::Unknown);
        }
        if self.is_read_only(command) {
            return Classification::empty(CommandShape::Skip);
        }

        let Some(tokens) = shlex::split(command) else {
            debug!(command, "Unbalanced quoting, not tracking");
            return Classification::empty(CommandShape::Unknown);
        };

        let shape = CommandShape::of_tokens(&tokens);
        let resolved = shape
            .extract(&tokens)
            .into_iter()
            .map(|arg| paths::resolve(Path::new(arg), project_root))
            .collect();

        Classification {
            shape,
            paths: resolved,
        }
    }
}

/// Extract the resolved paths a shell command deletes or moves away.
pub fn classify(command: &str, project_root: &Path) -> Vec<PathBuf> {
    CommandClassifier::default()
        .classify(command, project_root)
        .paths
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/nonexistent-doctrack-root";

    fn run(command: &str) -> Vec<PathBuf> {
        classify(command, Path::new(ROOT))
    }

    fn under_root(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| Path::new(ROOT).join(n)).collect()
    }

    fn shape(command: &str) -> CommandShape {
        CommandClassifier::default()
            .classify(command, Path::new(ROOT))
            .shape
    }

    #[test]
    fn test_empty_command() {
        assert!(run("").is_empty());
        assert!(run("   \n\t").is_empty());
    }

    #[test]
    fn test_read_only_commands() {
        for command in [
            "git status",
            "ls -la",
            "cat a.txt",
            "git log --oneline",
            "cargo build",
            "python -m pytest",
            "curl https://example.com -o out.txt",
            "  grep -r foo .",
        ] {
            assert!(run(command).is_empty(), "{command}");
            assert_eq!(shape(command), CommandShape::Skip, "{command}");
        }
    }

    #[test]
    fn test_prefix_match_is_textual() {
        // "ls" also covers lsof; "go " does not cover gofmt.
        assert_eq!(shape("lsof -p 1"), CommandShape::Skip);
        assert_eq!(shape("gofmt -w main.go"), CommandShape::Unknown);
    }

    #[test]
    fn test_rm_multiple_files() {
        assert_eq!(run("rm a.txt b.txt"), under_root(&["a.txt", "b.txt"]));
    }

    #[test]
    fn test_rm_skips_flags() {
        assert_eq!(run("rm -rf build -v dist"), under_root(&["build", "dist"]));
    }

    #[test]
    fn test_rm_stops_at_control_operator() {
        assert_eq!(run("rm a.txt && echo done"), under_root(&["a.txt"]));
        assert_eq!(run("rm a.txt ; rm b.txt"), under_root(&["a.txt"]));
        assert_eq!(run("rm a.txt 2> /dev/null"), under_root(&["a.txt"]));
        assert_eq!(run("rm a.txt 2>&1 | tee log"), under_root(&["a.txt"]));
        assert!(run("rm > out.txt").is_empty());
    }

    #[test]
    fn test_rm_quoted_path() {
        assert_eq!(
            run("rm 'my file.txt' \"other file.md\""),
            under_root(&["my file.txt", "other file.md"])
        );
    }

    #[test]
    fn test_unbalanced_quotes() {
        assert!(run("rm 'unterminated.txt").is_empty());
        assert!(run("mv \"a.txt b.txt").is_empty());
    }

    #[test]
    fn test_git_rm() {
        assert_eq!(run("git rm -f tracked.txt"), under_root(&["tracked.txt"]));
        assert_eq!(
            run("git rm --cached a.rs b.rs || true"),
            under_root(&["a.rs", "b.rs"])
        );
    }

    #[test]
    fn test_mv_tracks_source_only() {
        assert_eq!(run("mv old.txt new.txt"), under_root(&["old.txt"]));
        assert_eq!(run("mv -f -v old.txt new.txt"), under_root(&["old.txt"]));
    }

    #[test]
    fn test_mv_needs_two_arguments() {
        assert!(run("mv old.txt").is_empty());
        assert_eq!(shape("mv old.txt"), CommandShape::Unknown);
    }

    #[test]
    fn test_mv_flags_only_before_operator() {
        assert!(run("mv -f && ls").is_empty());
    }

    #[test]
    fn test_git_mv() {
        assert_eq!(run("git mv src/a.rs src/b.rs"), under_root(&["src/a.rs"]));
        assert_eq!(run("git mv -k only.rs"), under_root(&["only.rs"]));
        assert_eq!(shape("git mv"), CommandShape::Unknown);
    }

    #[test]
    fn test_unlink() {
        assert_eq!(run("unlink stale.lock"), under_root(&["stale.lock"]));
        assert!(run("unlink && echo").is_empty());
        assert!(run("unlink").is_empty());
    }

    #[test]
    fn test_unknown_commands() {
        for command in ["touch a.txt", "sed -i s/a/b/ f.txt", "git commit -m msg", "rmdir x"] {
            assert!(run(command).is_empty(), "{command}");
        }
    }

    #[test]
    fn test_absolute_paths_kept() {
        assert_eq!(
            run("rm /nonexistent-doctrack-elsewhere/x.txt"),
            vec![PathBuf::from("/nonexistent-doctrack-elsewhere/x.txt")]
        );
    }

    #[test]
    fn test_extra_read_only_prefixes() {
        let classifier = CommandClassifier::new(vec!["rm -i ".to_string(), String::new()]);
        let root = Path::new(ROOT);

        assert!(classifier.classify("rm -i a.txt", root).paths.is_empty());
        assert_eq!(
            classifier.classify("rm a.txt", root).paths,
            under_root(&["a.txt"])
        );
    }

    #[test]
    fn test_shape_dispatch() {
        let tokens = |s: &str| shlex::split(s).unwrap();
        assert_eq!(
            CommandShape::of_tokens(&tokens("rm x")),
            CommandShape::RemoveLike { args_from: 1 }
        );
        assert_eq!(
            CommandShape::of_tokens(&tokens("git rm x")),
            CommandShape::RemoveLike { args_from: 2 }
        );
        assert_eq!(
            CommandShape::of_tokens(&tokens("mv a b")),
            CommandShape::MoveLike { args_from: 1 }
        );
        assert_eq!(
            CommandShape::of_tokens(&tokens("git mv a")),
            CommandShape::MoveLike { args_from: 2 }
        );
        assert_eq!(
            CommandShape::of_tokens(&tokens("unlink a")),
            CommandShape::UnlinkLike
        );
        assert_eq!(
            CommandShape::of_tokens(&tokens("git add a")),
            CommandShape::Unknown
        );
    }
}
