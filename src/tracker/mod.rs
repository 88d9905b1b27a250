//! Turns a tool invocation into the set of files worth recording.

pub mod command;
pub mod filter;
pub mod invocation;
pub mod paths;

pub use command::{classify, Classification, CommandClassifier, CommandShape};
pub use filter::{should_track, PathFilter};
pub use invocation::{ToolInvocation, ToolKind};
