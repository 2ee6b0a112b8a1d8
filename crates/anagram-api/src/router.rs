//! Axum router construction for the anagram API.
//!
//! Assembles all routes into a single [`Router`] wrapped in the timing
//! middleware, with CORS and request tracing enabled.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::timing;

/// Build the complete Axum router for the anagram server.
///
/// The router includes:
/// - `GET /api/v1/similar` -- anagrams of a known word
/// - `POST /api/v1/add-word` -- add a word
/// - `GET /api/v1/stats` -- counts and average processing time
///
/// Every response, including 404s, passes through the timing middleware
/// and carries the `X-Process-Time` header.
///
/// CORS is configured to allow any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([axum::http::HeaderName::from_static(
            timing::PROCESS_TIME_HEADER,
        )]);

    Router::new()
        .route("/api/v1/similar", get(handlers::get_similar))
        .route("/api/v1/add-word", post(handlers::add_word))
        .route("/api/v1/stats", get(handlers::get_stats))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            timing::record_timing,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
