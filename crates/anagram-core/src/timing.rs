//! Request timing aggregation.
//!
//! [`TimingCollector`] keeps an append-only log of [`TimingRecord`]s, one
//! per timed request, and answers filtered average queries over it for
//! the stats endpoint. Recording never fails: instrumentation must not
//! change the outcome of the request it measures.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// One timed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingRecord {
    /// When the request finished.
    pub timestamp: DateTime<Utc>,
    /// The request path (e.g. `/api/v1/similar`).
    pub endpoint: String,
    /// How long the request took to process.
    pub duration: Duration,
}

/// Optional filters applied to an average query. Supplied filters are
/// combined with logical AND; both time bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingFilter {
    /// Earliest timestamp to include.
    pub from: Option<DateTime<Utc>>,
    /// Latest timestamp to include.
    pub to: Option<DateTime<Utc>>,
    /// Exact endpoint to include.
    pub endpoint: Option<String>,
}

impl TimingFilter {
    /// Whether a record passes every supplied filter.
    pub fn matches(&self, record: &TimingRecord) -> bool {
        self.from.is_none_or(|from| record.timestamp >= from)
            && self.to.is_none_or(|to| record.timestamp <= to)
            && self
                .endpoint
                .as_deref()
                .is_none_or(|endpoint| record.endpoint == endpoint)
    }
}

/// Append-only log of request timings.
#[derive(Debug, Default)]
pub struct TimingCollector {
    records: RwLock<Vec<TimingRecord>>,
}

impl TimingCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request that finished now.
    pub async fn record(&self, endpoint: &str, duration: Duration) {
        self.record_at(endpoint, duration, Utc::now()).await;
    }

    /// Record a request with an explicit completion timestamp.
    pub async fn record_at(&self, endpoint: &str, duration: Duration, timestamp: DateTime<Utc>) {
        self.records.write().await.push(TimingRecord {
            timestamp,
            endpoint: endpoint.to_owned(),
            duration,
        });
    }

    /// Mean duration in microseconds of the records passing `filter`,
    /// or `0.0` when none do.
    #[allow(clippy::cast_precision_loss)]
    pub async fn average(&self, filter: &TimingFilter) -> f64 {
        let records = self.records.read().await;
        let (count, total_nanos) = records
            .iter()
            .filter(|record| filter.matches(record))
            .fold((0_u64, 0_u128), |(count, total), record| {
                (
                    count.saturating_add(1),
                    total.saturating_add(record.duration.as_nanos()),
                )
            });

        if count == 0 {
            return 0.0;
        }
        total_nanos as f64 / count as f64 / 1_000.0
    }

    /// Number of records ever collected, unfiltered.
    pub async fn total_count(&self) -> usize {
        self.records.read().await.len()
    }
}
