//! HTTP API for the anagram lookup service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`GET /api/v1/similar`** -- known anagrams of a word
//! - **`POST /api/v1/add-word`** -- add a word to the index and word file
//! - **`GET /api/v1/stats`** -- word count, request count, and average
//!   processing time, optionally filtered by time range and endpoint
//!
//! # Architecture
//!
//! Handlers are thin: they decode the request, call the
//! [`WordService`](anagram_core::WordService) in [`AppState`], and map
//! [`LookupError`](anagram_core::LookupError) to a `{"detail": ..}` body
//! through [`ApiError`]. The [`timing`] middleware wraps every route,
//! feeding the stats endpoint and stamping each response with an
//! `X-Process-Time` header.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod timing;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, bind_listener, start_server};
pub use state::AppState;
