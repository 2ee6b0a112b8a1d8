//! Request orchestration over the index, store, and timing collector.
//!
//! [`WordService`] owns no state of its own: it holds shared handles to
//! the [`AnagramIndex`], [`WordStore`], and [`TimingCollector`] and
//! composes them into the three operations the HTTP layer exposes.

use std::sync::Arc;

use tracing::{error, info};

use crate::error::LookupError;
use crate::index::AnagramIndex;
use crate::store::WordStore;
use crate::timing::{TimingCollector, TimingFilter};
use crate::word::Word;

/// Aggregate numbers reported by the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Distinct words in the index.
    pub total_words: usize,
    /// Timed requests ever recorded.
    pub total_requests: usize,
    /// Mean processing time of the filtered requests, truncated to whole
    /// microseconds.
    pub avg_processing_time_microseconds: u64,
}

/// Validation plus composition of the anagram components.
#[derive(Debug, Clone)]
pub struct WordService {
    index: Arc<AnagramIndex>,
    store: Arc<WordStore>,
    timings: Arc<TimingCollector>,
}

impl WordService {
    /// Wrap existing components.
    pub const fn new(
        index: Arc<AnagramIndex>,
        store: Arc<WordStore>,
        timings: Arc<TimingCollector>,
    ) -> Self {
        Self {
            index,
            store,
            timings,
        }
    }

    /// Load every word from `store` into a fresh index.
    ///
    /// An unreadable store yields an empty index (see
    /// [`WordStore::load_all`]); startup never fails here.
    pub async fn bootstrap(store: Arc<WordStore>, timings: Arc<TimingCollector>) -> Self {
        let index = AnagramIndex::from_words(store.load_all().await);
        let (words, groups) = (index.len().await, index.group_count().await);
        info!(words, groups, "Anagram index built");
        Self::new(Arc::new(index), store, timings)
    }

    /// Known anagrams of `raw`, excluding `raw` itself.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidInput`] for empty or non-alphabetic
    /// input and [`LookupError::NotFound`] if the word was never added.
    pub async fn find_similar(&self, raw: &str) -> Result<Vec<Word>, LookupError> {
        let word = Word::parse(raw)?;
        self.index.lookup(&word).await
    }

    /// Add a new word to the index and the backing file.
    ///
    /// If the file append fails the word is removed from the index again,
    /// so the index never holds a word the file does not.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidInput`] for empty or non-alphabetic
    /// input, [`LookupError::AlreadyExists`] for a known word, and
    /// [`LookupError::Storage`] if the append fails.
    pub async fn add_word(&self, raw: &str) -> Result<Word, LookupError> {
        let word = Word::parse(raw)?;
        if !self.index.insert(word.clone()).await {
            return Err(LookupError::AlreadyExists(word.into_inner()));
        }

        if let Err(e) = self.store.append(&word).await {
            self.index.remove(&word).await;
            error!(word = %word, error = %e, "Append failed, word removed from index");
            return Err(e.into());
        }

        info!(word = %word, "Word added");
        Ok(word)
    }

    /// Word and request counts plus the filtered average latency.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub async fn stats(&self, filter: &TimingFilter) -> Stats {
        let average = self.timings.average(filter).await;
        Stats {
            total_words: self.index.len().await,
            total_requests: self.timings.total_count().await,
            avg_processing_time_microseconds: average.trunc() as u64,
        }
    }

    /// The shared index.
    pub fn index(&self) -> &Arc<AnagramIndex> {
        &self.index
    }

    /// The shared word store.
    pub fn store(&self) -> &Arc<WordStore> {
        &self.store
    }

    /// The shared timing collector.
    pub fn timings(&self) -> &Arc<TimingCollector> {
        &self.timings
    }
}
