//! CLI command implementations.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::Dispatcher;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::markup::PlainRenderer;
use crate::session::{
    Authenticator, ChallengeVerifier, DenyAllVerifier, InMemorySessionStore, StaticVerifier,
};
use crate::store::{Gateway, MemoryStore, Row, PAGES_TABLE, TAGS_TABLE};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Seed file structure: pages plus their tags.
#[derive(Debug, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub pages: Vec<SeedPage>,
    #[serde(default)]
    pub tags: Vec<SeedTag>,
}

#[derive(Debug, Deserialize)]
pub struct SeedPage {
    pub id: i64,
    pub path: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub edits: Vec<String>,
    #[serde(default)]
    pub modified: i64,
}

#[derive(Debug, Deserialize)]
pub struct SeedTag {
    pub page_id: i64,
    pub tag: String,
    #[serde(default)]
    pub views: u64,
}

/// Parse arguments and run the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve {
            addr,
            seed,
            accept_response,
            bypass_pattern,
        } => serve(
            &addr,
            seed.as_deref(),
            accept_response.as_deref(),
            bypass_pattern.as_deref(),
        ),
    }
}

fn serve(
    addr: &str,
    seed: Option<&Path>,
    accept_response: Option<&str>,
    bypass_pattern: Option<&str>,
) -> CliResult<()> {
    init_tracing();

    let store = Arc::new(MemoryStore::new());
    if let Some(path) = seed {
        load_seed(path, &store)?;
        info!(
            pages = store.row_count(PAGES_TABLE),
            tags = store.row_count(TAGS_TABLE),
            "seed content loaded"
        );
    }

    let verifier: Arc<dyn ChallengeVerifier> = match accept_response {
        Some(expected) => Arc::new(StaticVerifier::new(expected)),
        None => Arc::new(DenyAllVerifier),
    };
    let mut authenticator = Authenticator::new(verifier);
    if let Some(raw) = bypass_pattern {
        let pattern = Regex::new(raw)
            .map_err(|e| CliError::config_error(format!("invalid bypass pattern: {}", e)))?;
        authenticator = authenticator.with_bypass_pattern(pattern);
    }

    let dispatcher = Dispatcher::new(
        Gateway::new(store),
        authenticator,
        Arc::new(InMemorySessionStore::new()),
        Arc::new(PlainRenderer),
    );

    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| CliError::config_error("addr must be host:port"))?;
    let port: u16 = port
        .parse()
        .map_err(|e| CliError::config_error(format!("invalid port: {}", e)))?;
    let config = HttpServerConfig {
        host: host.to_string(),
        port,
        ..Default::default()
    };

    let server = HttpServer::with_config(dispatcher, config);

    let runtime = tokio::runtime::Runtime::new().map_err(|e| CliError::io_error(e.to_string()))?;
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::io_error(e.to_string()))
}

/// Load a JSON seed file into the in-memory store.
pub fn load_seed(path: &Path, store: &MemoryStore) -> CliResult<()> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CliError::config_error(format!("cannot read seed file: {}", e)))?;
    let seed: Seed = serde_json::from_str(&raw)
        .map_err(|e| CliError::config_error(format!("malformed seed file: {}", e)))?;

    for page in seed.pages {
        store.insert(
            PAGES_TABLE,
            Row::new()
                .set("id", page.id)
                .set("path", page.path)
                .set("title", page.title)
                .set("content", page.content)
                .set("views", page.views)
                .set("edits", page.edits.join(","))
                .set("modified", page.modified),
        );
    }
    for tag in seed.tags {
        store.insert(
            TAGS_TABLE,
            Row::new()
                .set("page_id", tag.page_id)
                .set("tag", tag.tag)
                .set("views", tag.views),
        );
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
