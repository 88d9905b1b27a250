//! PostToolUse hook registration in `.claude/settings.json`.
//!
//! Settings format:
//! `{ "hooks": { "PostToolUse": [ { "matcher": "...", "hooks": [ {"type": "command", "command": "..."} ] } ] } }`

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::info;

use crate::cli::gitignore;
use crate::config::{Config, DEFAULT_STATE_DIR};
use crate::error::Error;
use crate::tracker::paths;

/// Hook event doctrack listens on.
pub const HOOK_EVENT: &str = "PostToolUse";

/// Tools whose invocations are routed to the hook.
pub const HOOK_MATCHER: &str = "Edit|Write|MultiEdit|Bash";

/// Command the host runs for each matching invocation.
pub const HOOK_COMMAND: &str = "doctrack post-tool-use";

/// Path to the project's settings file.
pub fn settings_path(project_root: &Path) -> PathBuf {
    project_root.join(DEFAULT_STATE_DIR).join("settings.json")
}

/// doctrack's matcher group.
pub fn hook_entry() -> Value {
    json!({
        "matcher": HOOK_MATCHER,
        "hooks": [
            {
                "type": "command",
                "command": HOOK_COMMAND
            }
        ]
    })
}

fn is_doctrack_hook(hook: &Value) -> bool {
    hook.get("command").and_then(Value::as_str) == Some(HOOK_COMMAND)
}

/// Whether any PostToolUse group already runs doctrack.
pub fn hook_installed(settings: &Value) -> bool {
    settings
        .get("hooks")
        .and_then(|hooks| hooks.get(HOOK_EVENT))
        .and_then(Value::as_array)
        .is_some_and(|groups| {
            groups.iter().any(|group| {
                group
                    .get("hooks")
                    .and_then(Value::as_array)
                    .is_some_and(|hooks| hooks.iter().any(is_doctrack_hook))
            })
        })
}

fn read_settings(path: &Path) -> Result<Value, Error> {
    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let settings = if content.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&content)?
    };

    if !settings.is_object() {
        return Err(Error::other(format!(
            "{} is not a JSON object",
            path.display()
        )));
    }
    Ok(settings)
}

fn write_settings(path: &Path, settings: &Value) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let output = serde_json::to_string_pretty(settings)?;
    fs::write(path, format!("{}\n", output))?;
    Ok(())
}

/// Add doctrack's hook to a settings file, preserving everything else.
///
/// Returns `false` if the hook was already there. An existing file is
/// copied to `backup_path` before it is rewritten.
pub fn merge_hook(path: &Path, backup_path: &Path) -> Result<bool, Error> {
    let mut settings = read_settings(path)?;
    if hook_installed(&settings) {
        return Ok(false);
    }

    if path.exists() {
        fs::copy(path, backup_path)?;
    }

    let obj = settings
        .as_object_mut()
        .ok_or_else(|| Error::other("settings is not an object"))?;
    let hooks = obj
        .entry("hooks")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| Error::other("\"hooks\" in settings is not an object"))?;
    let groups = hooks
        .entry(HOOK_EVENT)
        .or_insert_with(|| json!([]))
        .as_array_mut()
        .ok_or_else(|| Error::other(format!("\"hooks.{}\" is not an array", HOOK_EVENT)))?;
    groups.push(hook_entry());

    write_settings(path, &settings)?;
    Ok(true)
}

/// Remove doctrack's hook from a settings file, leaving other hooks alone.
///
/// Returns `false` if there was nothing to remove.
pub fn remove_hook(path: &Path) -> Result<bool, Error> {
    if !path.exists() {
        return Ok(false);
    }

    let mut settings = read_settings(path)?;
    if !hook_installed(&settings) {
        return Ok(false);
    }

    let Some(hooks) = settings.get_mut("hooks").and_then(Value::as_object_mut) else {
        return Ok(false);
    };

    if let Some(groups) = hooks.get_mut(HOOK_EVENT).and_then(Value::as_array_mut) {
        for group in groups.iter_mut() {
            if let Some(commands) = group.get_mut("hooks").and_then(Value::as_array_mut) {
                commands.retain(|hook| !is_doctrack_hook(hook));
            }
        }
        // Drop groups we emptied.
        groups.retain(|group| {
            group
                .get("hooks")
                .and_then(Value::as_array)
                .map_or(true, |commands| !commands.is_empty())
        });
        if groups.is_empty() {
            hooks.remove(HOOK_EVENT);
        }
    }

    if hooks.is_empty() {
        if let Some(obj) = settings.as_object_mut() {
            obj.remove("hooks");
        }
    }

    write_settings(path, &settings)?;
    Ok(true)
}

/// Register the hook and ignore the dirty-file log in git.
pub fn install(project_root: &Path) -> Result<(), Error> {
    let root = paths::resolve_lenient(project_root);
    let config = Config::load(&root)?;

    let settings = settings_path(&root);
    let backup = settings.with_extension("json.doctrack.bak");
    if merge_hook(&settings, &backup)? {
        info!(path = %settings.display(), "Installed PostToolUse hook");
        println!("Hook installed in {}", settings.display());
    } else {
        println!("Hook already installed in {}", settings.display());
    }

    gitignore::update_gitignore(&root.join(".gitignore"), &gitignore::ignore_entry(&config))?;
    info!("Updated .gitignore");

    Ok(())
}

/// Remove the hook and the .gitignore block.
pub fn uninstall(project_root: &Path) -> Result<(), Error> {
    let root = paths::resolve_lenient(project_root);

    let settings = settings_path(&root);
    if remove_hook(&settings)? {
        info!(path = %settings.display(), "Removed PostToolUse hook");
        println!("Hook removed from {}", settings.display());
    } else {
        println!("Hook not installed.");
    }

    if gitignore::remove_from_gitignore(&root.join(".gitignore"))? {
        info!("Removed .gitignore block");
    }

    Ok(())
}
