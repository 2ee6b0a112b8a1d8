//! The in-memory anagram index.
//!
//! [`AnagramIndex`] groups every known [`Word`] under its [`Signature`].
//! Each group keeps insertion order and never holds the same word twice,
//! so every word lives in exactly one group.
//!
//! # Concurrency
//!
//! The map and its cardinality sit behind a single [`RwLock`]. Lookups
//! take the read side and run in parallel; inserts and removals take the
//! write side, so a check-and-insert is one atomic step and concurrent
//! inserts into the same group cannot lose updates.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::LookupError;
use crate::word::{Signature, Word};

/// Signature groups plus a running word count, guarded together.
#[derive(Debug, Default)]
struct Groups {
    by_signature: HashMap<Signature, Vec<Word>>,
    len: usize,
}

impl Groups {
    fn insert(&mut self, word: Word) -> bool {
        let group = self.by_signature.entry(word.signature()).or_default();
        if group.contains(&word) {
            return false;
        }
        group.push(word);
        self.len = self.len.saturating_add(1);
        true
    }
}

/// Anagram groups keyed by sorted-letter signature.
#[derive(Debug, Default)]
pub struct AnagramIndex {
    groups: RwLock<Groups>,
}

impl AnagramIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from an initial word list. Duplicates collapse.
    pub fn from_words<I>(words: I) -> Self
    where
        I: IntoIterator<Item = Word>,
    {
        let mut groups = Groups::default();
        for word in words {
            groups.insert(word);
        }
        Self {
            groups: RwLock::new(groups),
        }
    }

    /// Add a word to its group.
    ///
    /// Returns `false` (and changes nothing) if the word was already
    /// present.
    pub async fn insert(&self, word: Word) -> bool {
        self.groups.write().await.insert(word)
    }

    /// Remove a word, dropping its group if it becomes empty.
    ///
    /// Returns whether the word was present.
    pub async fn remove(&self, word: &Word) -> bool {
        let mut groups = self.groups.write().await;
        let signature = word.signature();
        let Some(group) = groups.by_signature.get_mut(&signature) else {
            return false;
        };
        let Some(position) = group.iter().position(|w| w == word) else {
            return false;
        };
        group.remove(position);
        if group.is_empty() {
            groups.by_signature.remove(&signature);
        }
        groups.len = groups.len.saturating_sub(1);
        true
    }

    /// Whether the word is a member of its signature's group.
    pub async fn contains(&self, word: &Word) -> bool {
        self.groups
            .read()
            .await
            .by_signature
            .get(&word.signature())
            .is_some_and(|group| group.contains(word))
    }

    /// Return the other members of the word's anagram group, in the order
    /// they were added.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if the word itself was never added.
    pub async fn lookup(&self, word: &Word) -> Result<Vec<Word>, LookupError> {
        let groups = self.groups.read().await;
        let group = groups
            .by_signature
            .get(&word.signature())
            .filter(|group| group.contains(word))
            .ok_or_else(|| LookupError::NotFound(word.to_string()))?;

        Ok(group.iter().filter(|w| *w != word).cloned().collect())
    }

    /// Total number of distinct words.
    pub async fn len(&self) -> usize {
        self.groups.read().await.len
    }

    /// Whether no words are indexed.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of distinct anagram groups.
    pub async fn group_count(&self) -> usize {
        self.groups.read().await.by_signature.len()
    }
}
