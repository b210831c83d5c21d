//! CLI command implementations
//!
//! `init` lays out the data directory. The other commands refuse to run
//! against an uninitialized directory, open the book store (replaying the
//! storage log), and then do their one job.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::books::{self, AuthorPipeline, BookStore, RecordStore};
use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::storage::DATA_SUBDIR;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_json, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
        Command::Seed { config } => seed(&config),
        Command::Stats { config, pipeline } => stats(&config, &pipeline),
    }
}

/// Loads the config and installs logging in its format
fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    init_logging(config.log_format);
    Ok(config)
}

/// Create the data directory layout
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    let dir = data_dir.join(DATA_SUBDIR);
    fs::create_dir_all(&dir).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", dir, e))
    })?;

    tracing::info!(data_dir = %data_dir.display(), "data directory initialized");
    write_response(json!({"initialized": true}))
}

/// Open the store and serve HTTP until Ctrl-C
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let store: Arc<dyn RecordStore> = Arc::new(open_store(&config)?);
    let server = HttpServer::with_config(config.http.clone(), store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Insert the sample books
pub fn seed(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let ids = books::seed(&store)?;
    let inserted: Vec<Value> = ids.iter().map(|id| Value::String(id.to_hex())).collect();

    write_response(json!({ "inserted": inserted }))
}

/// Print the named statistics
pub fn stats(config_path: &Path, pipeline: &str) -> CliResult<()> {
    let pipeline: AuthorPipeline = pipeline.parse().map_err(|e| {
        CliError::config_error(format!(
            "{}. Expected one of: {}",
            e,
            AuthorPipeline::ALL.map(|p| p.as_str()).join(", ")
        ))
    })?;

    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let documents: Vec<Value> = store.author_statistics(pipeline)?.collect();
    write_json(&json!({ "author_statistics": documents }))
}

/// Check if a data directory is initialized
fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join(DATA_SUBDIR).is_dir()
}

fn open_store(config: &Config) -> CliResult<BookStore> {
    let data_dir = config.data_path();
    if !is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }

    Ok(BookStore::open(
        data_dir,
        &config.collection,
        config.search_mode,
    )?)
}
