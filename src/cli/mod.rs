//! CLI module
//!
//! Command-line interface for browsing the hub.
//!
//! # Commands
//!
//! - `whoami` - Log in and show the account in use
//! - `repos` - List repositories of a namespace
//! - `tags` - List tags of a repository
//! - `tokens` - List personal access tokens
//! - `members` - List organization members
//! - `teams` - List team members

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
