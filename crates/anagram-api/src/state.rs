//! Shared application state for the anagram API server.
//!
//! [`AppState`] holds the [`WordService`] every handler calls into and
//! the set of request paths the timing middleware records. It is built
//! once at startup and injected via Axum's `State` extractor.

use std::collections::BTreeSet;
use std::sync::Arc;

use anagram_core::{TimingCollector, WordService};

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Word lookup, insertion, and stats.
    pub service: WordService,
    /// Paths whose processing time feeds the stats endpoint.
    pub tracked_endpoints: BTreeSet<String>,
}

impl AppState {
    /// Create application state around a service.
    pub fn new<I, S>(service: WordService, tracked_endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            service,
            tracked_endpoints: tracked_endpoints.into_iter().map(Into::into).collect(),
        }
    }

    /// The timing collector the middleware records into.
    pub fn timings(&self) -> &Arc<TimingCollector> {
        self.service.timings()
    }

    /// Whether requests to `path` are recorded.
    pub fn is_tracked(&self, path: &str) -> bool {
        self.tracked_endpoints.contains(path)
    }
}
