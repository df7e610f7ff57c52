//! CLI module for minnow
//!
//! Provides the command-line interface:
//! - serve: load the seed content and host the API over HTTP

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{load_seed, run, run_command, Seed, SeedPage, SeedTag};
pub use errors::{CliError, CliErrorCode, CliResult};
