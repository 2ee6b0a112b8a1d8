//! REST API endpoint handlers for the anagram server.
//!
//! All handlers call into the [`WordService`](anagram_core::WordService)
//! held by the shared [`AppState`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/v1/similar?word=` | Known anagrams of a word |
//! | `POST` | `/api/v1/add-word` | Add a word (`{"word": ".."}`) |
//! | `GET` | `/api/v1/stats` | Word/request counts and average latency |

use std::sync::Arc;

use anagram_core::{Stats, TimingFilter, Word};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/v1/similar`.
#[derive(Debug, serde::Deserialize)]
pub struct SimilarQuery {
    /// The word to find anagrams of. A missing value is treated as empty.
    pub word: Option<String>,
}

/// Response body for `GET /api/v1/similar`.
#[derive(Debug, serde::Serialize)]
pub struct SimilarResponse {
    /// Anagrams of the queried word, in the order they were added.
    pub similar: Vec<Word>,
}

/// Request body for `POST /api/v1/add-word`.
#[derive(Debug, serde::Deserialize)]
pub struct AddWordRequest {
    /// The word to add.
    pub word: String,
}

/// Response body carrying a human-readable message.
#[derive(Debug, serde::Serialize)]
pub struct DetailResponse {
    /// Human-readable message.
    pub detail: String,
}

/// Query parameters for `GET /api/v1/stats`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct StatsQuery {
    /// Earliest request completion time to include (ISO 8601).
    pub from: Option<String>,
    /// Latest request completion time to include (ISO 8601).
    pub to: Option<String>,
    /// Exact request path to include (e.g. `/api/v1/similar`).
    pub endpoint: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /api/v1/similar
// ---------------------------------------------------------------------------

/// Return every other known word made of the same letters.
pub async fn get_similar(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SimilarQuery>, QueryRejection>,
) -> Result<Json<SimilarResponse>, ApiError> {
    let Query(params) = query?;
    let raw = params.word.unwrap_or_default();
    let similar = state.service.find_similar(&raw).await?;
    Ok(Json(SimilarResponse { similar }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/add-word
// ---------------------------------------------------------------------------

/// Add a word to the index and the backing file.
pub async fn add_word(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddWordRequest>, JsonRejection>,
) -> Result<Json<DetailResponse>, ApiError> {
    let Json(request) = payload?;
    let word = state.service.add_word(&request.word).await?;
    Ok(Json(DetailResponse {
        detail: format!("'{word}' added successfully!"),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/stats
// ---------------------------------------------------------------------------

/// Return the word count, the request count, and the average processing
/// time of the requests matching the optional filters.
///
/// # Query Parameters
///
/// - `from`, `to`: inclusive ISO 8601 bounds on request completion time.
///   Timestamps without an offset are read as UTC.
/// - `endpoint`: exact request path.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<Stats>, ApiError> {
    let Query(params) = query?;
    let filter = params.into_filter()?;
    Ok(Json(state.service.stats(&filter).await))
}

impl StatsQuery {
    /// Validate the raw parameters into a [`TimingFilter`]. Empty values
    /// count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidQuery`] if a bound is not a recognizable
    /// ISO 8601 timestamp.
    pub fn into_filter(self) -> Result<TimingFilter, ApiError> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Ok(TimingFilter {
            from: present(self.from)
                .map(|raw| parse_timestamp("from", &raw))
                .transpose()?,
            to: present(self.to)
                .map(|raw| parse_timestamp("to", &raw))
                .transpose()?,
            endpoint: present(self.endpoint),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO 8601 timestamp: RFC 3339 with an offset, a naive
/// date-time (read as UTC), or a bare date (midnight UTC).
pub fn parse_timestamp(name: &str, raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(ApiError::InvalidQuery(format!(
        "'{name}' must be an ISO 8601 timestamp, got '{raw}'"
    )))
}
