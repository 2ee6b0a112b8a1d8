//! Command-line client for the anagram lookup service.
//!
//! `find`, `add`, `stats`, and `interactive` talk to a running
//! `anagram-server` over HTTP. `compact` works on the word file directly
//! and is meant for maintenance windows.

mod client;
mod interactive;
mod report;

use std::path::PathBuf;

use anagram_core::{ServiceConfig, WordStore};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::client::{ApiClient, StatsParams};

#[derive(Parser)]
#[command(name = "anagram")]
#[command(about = "Similar Words API CLI Tool")]
struct Cli {
    /// Base URL of the anagram server
    #[arg(long, env = "ANAGRAM_BASE_URL", default_value = "http://localhost:8000")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find similar words (anagrams)
    Find {
        /// Word to find anagrams for
        word: String,
    },
    /// Add a new word to the database
    Add {
        /// Word to add
        word: String,
    },
    /// Get API statistics
    Stats {
        /// Start date (ISO 8601 format)
        #[arg(long)]
        from: Option<String>,
        /// End date (ISO 8601 format)
        #[arg(long)]
        to: Option<String>,
        /// Filter by specific endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Start interactive mode
    Interactive,
    /// Sort and deduplicate the word file in place (run while the server is stopped)
    Compact {
        /// Word file to compact (defaults to `storage.words_path` from the config)
        #[arg(long)]
        words_path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.base_url);

    match cli.command {
        Commands::Find { word } => report::similar(&client, &word).await,
        Commands::Add { word } => report::add(&client, &word).await,
        Commands::Stats { from, to, endpoint } => {
            report::stats(&client, &StatsParams { from, to, endpoint }).await;
        }
        Commands::Interactive => {
            interactive::run(&client).await?;
        }
        Commands::Compact { words_path } => {
            let path = match words_path {
                Some(path) => path,
                None => ServiceConfig::load()?.storage.words_path,
            };
            let store = WordStore::new(path);
            let written = store.compact_sorted().await?;
            println!(
                "Words in {} ordered successfully ({written} words).",
                store.path().display()
            );
        }
    }

    Ok(())
}
