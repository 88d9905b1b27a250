//! Keeps the dirty-file log out of git.
//!
//! `install` writes one ignore line between doctrack's own marker comments;
//! `uninstall` deletes exactly that span and leaves the rest of the file alone.

use std::path::Path;

use crate::config::Config;
use crate::error::Error;

const BLOCK_START: &str = "# START doctrack Generated Files";
const BLOCK_END: &str = "# END doctrack Generated Files";

/// Ignore entry covering the log and its in-progress drain file.
pub fn ignore_entry(config: &Config) -> String {
    format!(
        "/{}/{}*",
        config.tracking.state_dir, config.tracking.dirty_file
    )
}

fn managed_block(entries: &str) -> String {
    format!("{}\n{}\n{}", BLOCK_START, entries, BLOCK_END)
}

/// Write the marker block listing `entries`, replacing an earlier block in
/// place. A missing or blank file ends up holding only the block.
pub fn update_gitignore(path: &Path, entries: &str) -> Result<(), Error> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let new_content = if content.trim().is_empty() {
        format!("{}\n", managed_block(entries))
    } else if content.contains(BLOCK_START) && content.contains(BLOCK_END) {
        replace_managed_block(&content, entries)?
    } else {
        format!("{}\n\n{}\n", content.trim_end(), managed_block(entries))
    };

    std::fs::write(path, new_content)?;
    Ok(())
}

fn replace_managed_block(content: &str, entries: &str) -> Result<String, Error> {
    let start_idx = content
        .find(BLOCK_START)
        .ok_or_else(|| Error::other("Block start marker not found"))?;
    let end_idx = content
        .find(BLOCK_END)
        .ok_or_else(|| Error::other("Block end marker not found"))?;

    if end_idx < start_idx {
        return Err(Error::other("Block markers are in wrong order"));
    }

    let before = &content[..start_idx];
    let after = &content[end_idx + BLOCK_END.len()..];

    Ok(format!("{}{}{}", before, managed_block(entries), after))
}

/// Strip the marker block, deleting the file if nothing else is left.
/// Returns `false` when there was no block.
pub fn remove_from_gitignore(path: &Path) -> Result<bool, Error> {
    if !path.exists() {
        return Ok(false);
    }

    let content = std::fs::read_to_string(path)?;
    let (Some(start_idx), Some(end_idx)) = (content.find(BLOCK_START), content.find(BLOCK_END))
    else {
        return Ok(false);
    };
    if end_idx < start_idx {
        return Ok(false);
    }

    let before = &content[..start_idx];
    let after = &content[end_idx + BLOCK_END.len()..];

    let new_content = format!("{}\n{}", before.trim_end(), after.trim_start());
    let new_content = new_content.trim();

    if new_content.is_empty() {
        std::fs::remove_file(path)?;
    } else {
        std::fs::write(path, format!("{}\n", new_content))?;
    }

    Ok(true)
}
