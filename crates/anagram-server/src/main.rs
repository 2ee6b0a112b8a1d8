//! Anagram lookup server binary.
//!
//! This is the main entry point that wires together the word store,
//! anagram index, timing collector, and HTTP API. It loads
//! configuration, builds the index from the word file, and serves
//! requests until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `anagram-config.yaml` (or `ANAGRAM_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Load the word file into the anagram index
//! 4. Build shared application state
//! 5. Serve the HTTP API

mod error;

use std::sync::Arc;

use anagram_api::{AppState, ServerConfig};
use anagram_core::config::LoggingConfig;
use anagram_core::{ServiceConfig, TimingCollector, WordService, WordStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ServerError;

/// Application entry point for the anagram server.
///
/// # Errors
///
/// Returns an error if configuration, logging setup, or the HTTP server
/// fails. An unreadable word file is not an error: the server starts
/// with an empty index.
#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // 1. Load configuration.
    let config_path = ServiceConfig::config_path();
    let config = ServiceConfig::load()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    if config_path.exists() {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        host = config.server.host,
        port = config.server.port,
        words_path = %config.storage.words_path.display(),
        tracked_endpoints = ?config.timing.tracked_endpoints,
        "anagram-server starting"
    );

    // 3. Load the word file into the index.
    let store = Arc::new(WordStore::new(config.storage.words_path.clone()));
    let timings = Arc::new(TimingCollector::new());
    let service = WordService::bootstrap(store, timings).await;

    // 4. Build shared state.
    let state = Arc::new(AppState::new(
        service,
        config.timing.tracked_endpoints.iter().cloned(),
    ));

    // 5. Serve until Ctrl-C.
    anagram_api::start_server(&ServerConfig::from(&config.server), state).await?;

    info!("anagram-server exited cleanly");
    Ok(())
}

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &LoggingConfig) -> Result<(), ServerError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.is_json() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| ServerError::Logging {
        message: e.to_string(),
    })
}
