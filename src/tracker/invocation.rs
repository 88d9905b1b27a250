//! PostToolUse payload parsing and dispatch.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::command::CommandClassifier;
use super::paths;
use crate::error::Error;

/// Tool invocation as delivered on the hook's stdin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInvocation {
    #[serde(default)]
    pub tool_name: Option<String>,

    #[serde(default)]
    pub tool_input: Value,
}

/// How a tool name is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKind {
    /// `Edit`, `Write`, `MultiEdit`: the `file_path` field.
    EditLike,
    /// `Bash`: the `command` field, via the classifier.
    Shell,
    /// No tool name (older payloads): treated like an edit.
    Legacy,
    /// Anything else is ignored.
    Other(String),
}

impl ToolKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Edit" | "Write" | "MultiEdit" => ToolKind::EditLike,
            "Bash" => ToolKind::Shell,
            "" => ToolKind::Legacy,
            other => ToolKind::Other(other.to_string()),
        }
    }
}

impl ToolInvocation {
    /// Parse hook stdin. Blank input is an empty invocation.
    pub fn parse(stdin: &str) -> Result<Self, Error> {
        if stdin.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(stdin)?)
    }

    pub fn kind(&self) -> ToolKind {
        ToolKind::from_name(self.tool_name.as_deref().unwrap_or(""))
    }

    fn input_str(&self, key: &str) -> &str {
        self.tool_input
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Resolved paths this invocation may have changed, before filtering.
    pub fn candidates(&self, classifier: &CommandClassifier, project_root: &Path) -> Vec<PathBuf> {
        match self.kind() {
            ToolKind::EditLike | ToolKind::Legacy => {
                let file_path = self.input_str("file_path");
                if file_path.is_empty() {
                    Vec::new()
                } else {
                    vec![paths::resolve(Path::new(file_path), project_root)]
                }
            }
            ToolKind::Shell => {
                classifier
                    .classify(self.input_str("command"), project_root)
                    .paths
            }
            ToolKind::Other(_) => Vec::new(),
        }
    }
}
