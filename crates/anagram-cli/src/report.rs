//! Human-readable output for API calls. Failures are printed, not
//! returned, so the interactive shell keeps running.

use crate::client::{ApiClient, ClientError, StatsParams};

/// Print the anagrams of `word`.
pub async fn similar(client: &ApiClient, word: &str) {
    match client.similar(word).await {
        Ok(similar) if similar.is_empty() => println!("\nNo similar words found for '{word}'"),
        Ok(similar) => {
            println!("\nSimilar words to '{word}':");
            for (i, w) in similar.iter().enumerate() {
                println!("  {}. {w}", i.saturating_add(1));
            }
        }
        Err(e) => print_error(&e),
    }
}

/// Add `word` and print the confirmation.
pub async fn add(client: &ApiClient, word: &str) {
    match client.add_word(word).await {
        Ok(detail) => println!("\n{detail}"),
        Err(e) => print_error(&e),
    }
}

/// Print usage statistics and any filters applied.
pub async fn stats(client: &ApiClient, params: &StatsParams) {
    match client.stats(params).await {
        Ok(stats) => {
            println!("\nAPI Statistics:");
            println!("  Total Words: {}", stats.total_words);
            println!("  Total Requests: {}", stats.total_requests);
            println!(
                "  Avg Processing Time: {} microseconds",
                stats.avg_processing_time_microseconds
            );

            if params.is_filtered() {
                println!("\nFilters applied:");
                if let Some(from) = &params.from {
                    println!("  From: {from}");
                }
                if let Some(to) = &params.to {
                    println!("  To: {to}");
                }
                if let Some(endpoint) = &params.endpoint {
                    println!("  Endpoint: {endpoint}");
                }
            }
        }
        Err(e) => print_error(&e),
    }
}

fn print_error(error: &ClientError) {
    match error {
        ClientError::Connection { base_url } => {
            println!("\nError: Cannot connect to API at {base_url}");
            println!("Make sure the API server is running: anagram-server");
        }
        ClientError::Api { detail, .. } => println!("\nError: {detail}"),
        ClientError::Http(e) => println!("\nUnexpected error: {e}"),
    }
}
