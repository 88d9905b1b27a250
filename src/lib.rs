//! doctrack library.
//!
//! Records files changed by AI coding tools so CLAUDE.md files can be
//! brought up to date at the end of a turn.

pub mod cli;
pub mod config;
pub mod error;
pub mod storage;
pub mod tracker;

pub use error::Error;
