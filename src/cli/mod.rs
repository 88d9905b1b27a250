//! CLI commands for doctrack.

pub mod classify;
pub mod drain;
pub mod gitignore;
pub mod install;
pub mod post_tool_use;
