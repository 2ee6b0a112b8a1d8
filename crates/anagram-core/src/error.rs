//! Error types for the anagram core.
//!
//! [`LookupError`] is what callers of [`WordService`](crate::service::WordService)
//! see. [`StoreError`] covers every failure of the backing word file and is
//! wrapped by [`LookupError::Storage`] when it reaches a request.

/// Errors returned by word lookup and word insertion.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The word was empty or contained non-alphabetic characters.
    #[error("Invalid word \u{2013} must contain only letters")]
    InvalidInput(String),

    /// The word has never been added.
    #[error("'{0}' not found in the database.")]
    NotFound(String),

    /// The word is already known.
    #[error("'{0}' already exists in the database.")]
    AlreadyExists(String),

    /// The backing word file could not be written.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

/// Failures of the file-backed [`WordStore`](crate::store::WordStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the word file failed.
    #[error("word file I/O failed on {path}: {source}")]
    Io {
        /// The file being accessed.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compacted temporary file could not replace the original.
    #[error("failed to replace word file {path}: {source}")]
    Persist {
        /// The file being replaced.
        path: String,
        /// The underlying persist error.
        source: tempfile::PersistError,
    },

    /// The blocking task running file work was cancelled or panicked.
    #[error("store task failed: {message}")]
    Task {
        /// Description of the join failure.
        message: String,
    },
}

impl StoreError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
