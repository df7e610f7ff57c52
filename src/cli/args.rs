//! CLI argument definitions using clap
//!
//! Commands:
//! - minnow serve --addr <host:port> --seed <path> [--accept-response <s>] [--bypass-pattern <regex>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// minnow - request-handling core for a small wiki
#[derive(Parser, Debug)]
#[command(name = "minnow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the wiki API over HTTP
    Serve {
        /// Address to bind, host:port
        #[arg(long, default_value = "0.0.0.0:8750")]
        addr: String,

        /// JSON seed file with pages and tags to load into the store
        #[arg(long)]
        seed: Option<PathBuf>,

        /// Response accepted by the built-in static verifier; without it
        /// every verification is rejected
        #[arg(long)]
        accept_response: Option<String>,

        /// Verification bypass pattern (operations escape hatch, off by default)
        #[arg(long)]
        bypass_pattern: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
