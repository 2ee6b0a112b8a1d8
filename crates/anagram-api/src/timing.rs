//! Request timing middleware.
//!
//! [`record_timing`] wraps every route. It measures how long the inner
//! service took, records the sample in the [`TimingCollector`] when the
//! path is tracked, and stamps the response with an `X-Process-Time`
//! header in microseconds. It never changes the status or body of the
//! response it measures.
//!
//! [`TimingCollector`]: anagram_core::TimingCollector

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

/// Name of the processing-time response header.
pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Time the request, record it if tracked, and add the timing header.
pub async fn record_timing(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let mut response = next.run(request).await;
    let elapsed = started.elapsed();

    if state.is_tracked(&path) {
        state.timings().record(&path, elapsed).await;
    }

    // `µ` is obs-text, which `from_str` rejects but `from_bytes` accepts.
    match HeaderValue::from_bytes(format_process_time(elapsed).as_bytes()) {
        Ok(value) => {
            response.headers_mut().insert(PROCESS_TIME_HEADER, value);
        }
        Err(e) => tracing::warn!(error = %e, "Could not build process time header"),
    }

    response
}

/// Render a duration as microseconds with two decimals, e.g. `12.34µs`.
#[allow(clippy::cast_precision_loss)]
pub fn format_process_time(elapsed: Duration) -> String {
    let micros = elapsed.as_nanos() as f64 / 1_000.0;
    format!("{micros:.2}\u{b5}s")
}
