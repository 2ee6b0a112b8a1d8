//! File-backed word persistence.
//!
//! The backing file is plain text, one word per line. Blank lines are
//! ignored and there is no header. [`WordStore`] is the only reader and
//! writer of the file.
//!
//! # Design
//!
//! - **Append-only**: new words are appended with `O_APPEND`; the normal
//!   path never rewrites the file.
//! - **Serialized writes**: appends and compaction take the same async
//!   mutex, so two writers never interleave.
//! - **Atomic compaction**: [`WordStore::compact_sorted`] writes a sorted,
//!   deduplicated copy of the non-blank lines to a temporary file in the
//!   same directory and renames it over the original. Lines are compared
//!   and written as stored, so compaction never drops or recases an entry.
//!   A crash before the rename leaves the original file untouched.

use std::collections::BTreeSet;
use std::io::{BufWriter, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::word::Word;

/// The plain-text word file.
#[derive(Debug)]
pub struct WordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl WordStore {
    /// Create a store over the file at `path`. The file is not touched
    /// until the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every word in the file.
    ///
    /// A file that cannot be read (missing, permission denied) yields an
    /// empty set and a warning so that startup can proceed.
    pub async fn load_all(&self) -> BTreeSet<Word> {
        match self.try_load_all().await {
            Ok(words) => words,
            Err(e) => {
                warn!(error = %e, "Word file unreadable, starting with an empty word list");
                BTreeSet::new()
            }
        }
    }

    /// Read every word in the file, reporting read failures.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read.
    pub async fn try_load_all(&self) -> Result<BTreeSet<Word>, StoreError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        let words = parse_lines(&contents, &self.path);
        info!(path = %self.path.display(), words = words.len(), "Word file loaded");
        Ok(words)
    }

    /// Durably append one word as a new line.
    ///
    /// Creates the file if needed. If the existing content does not end in
    /// a newline, one is written first so the word lands on its own line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be opened, written,
    /// or synced. Existing content is never truncated.
    pub async fn append(&self, word: &Word) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let io_err = |e| StoreError::io(&self.path, e);

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;

        let mut line = String::with_capacity(word.as_str().len().saturating_add(2));
        if !ends_with_newline(&mut file).await.map_err(io_err)? {
            line.push('\n');
        }
        line.push_str(word.as_str());
        line.push('\n');

        file.write_all(line.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;
        file.sync_data().await.map_err(io_err)?;

        debug!(word = %word, path = %self.path.display(), "Word appended");
        Ok(())
    }

    /// Rewrite the file with its trimmed, non-blank lines deduplicated and
    /// sorted bytewise.
    ///
    /// Waits for in-flight appends and blocks new ones until the rename
    /// is done. Returns the number of lines written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read, the temporary
    /// file cannot be written, or the rename fails. On any error the
    /// original file is unchanged.
    pub async fn compact_sorted(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();

        let written = tokio::task::spawn_blocking(move || stage_compaction_at(&path)?.commit())
            .await
            .map_err(|e| StoreError::Task {
                message: e.to_string(),
            })??;

        info!(path = %self.path.display(), words = written, "Word file compacted");
        Ok(written)
    }

    /// Write the compacted copy without replacing the original.
    ///
    /// This does not take the append lock; on a store that is serving
    /// requests use [`compact_sorted`](Self::compact_sorted) instead.
    /// Dropping the returned value discards the temporary file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read or the
    /// temporary copy cannot be written.
    pub fn stage_compaction(&self) -> Result<StagedCompaction, StoreError> {
        stage_compaction_at(&self.path)
    }
}

/// A fully written, synced, sorted copy of the word file waiting to
/// replace the original.
#[derive(Debug)]
pub struct StagedCompaction {
    temp: NamedTempFile,
    target: PathBuf,
    word_count: usize,
}

impl StagedCompaction {
    /// Number of lines in the compacted copy.
    pub const fn word_count(&self) -> usize {
        self.word_count
    }

    /// Location of the temporary copy.
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Atomically rename the copy over the original file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persist`] if the rename fails; the temporary
    /// file is removed and the original left in place.
    pub fn commit(self) -> Result<usize, StoreError> {
        let Self {
            temp,
            target,
            word_count,
        } = self;
        temp.persist(&target).map_err(|e| StoreError::Persist {
            path: target.display().to_string(),
            source: e,
        })?;
        Ok(word_count)
    }
}

fn stage_compaction_at(path: &Path) -> Result<StagedCompaction, StoreError> {
    let io_err = |e| StoreError::io(path, e);

    let contents = std::fs::read_to_string(path).map_err(io_err)?;
    // Lines are kept verbatim: compaction must not drop entries that
    // loading would skip.
    let lines: BTreeSet<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    // The temp file must live on the same filesystem for the rename to be atomic.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        for line in &lines {
            writeln!(writer, "{line}").map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;
    }
    temp.as_file().sync_all().map_err(io_err)?;

    Ok(StagedCompaction {
        temp,
        target: path.to_path_buf(),
        word_count: lines.len(),
    })
}

/// Parse file contents into canonical words, skipping blank and invalid lines.
fn parse_lines(contents: &str, path: &Path) -> BTreeSet<Word> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match Word::parse(line) {
            Ok(word) => Some(word),
            Err(_) => {
                warn!(path = %path.display(), line, "Skipping invalid word in word file");
                None
            }
        })
        .collect()
}

async fn ends_with_newline(file: &mut tokio::fs::File) -> std::io::Result<bool> {
    if file.metadata().await?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last == *b"\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn w(raw: &str) -> Word {
        Word::parse(raw).unwrap()
    }

    fn store_with(dir: &TempDir, contents: &str) -> WordStore {
        let path = dir.path().join("words.txt");
        std::fs::write(&path, contents).unwrap();
        WordStore::new(path)
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = WordStore::new(dir.path().join("absent.txt"));
        assert!(store.load_all().await.is_empty());
        assert!(store.try_load_all().await.is_err());
    }

    #[tokio::test]
    async fn load_trims_dedupes_and_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, "listen\n\n  silent  \nListen\n\t\nenlist");

        let words = store.load_all().await;
        let texts: Vec<&str> = words.iter().map(Word::as_str).collect();
        assert_eq!(texts, vec!["enlist", "listen", "silent"]);
    }

    #[tokio::test]
    async fn load_skips_invalid_lines() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, "good\nb4d\nfine\n");
        assert_eq!(store.load_all().await.len(), 2);
    }

    #[tokio::test]
    async fn append_creates_the_file() {
        let dir = TempDir::new().unwrap();
        let store = WordStore::new(dir.path().join("new.txt"));

        store.append(&w("alpha")).await.unwrap();
        store.append(&w("beta")).await.unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "alpha\nbeta\n");
    }

    #[tokio::test]
    async fn append_starts_a_new_line_when_needed() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, "first");

        store.append(&w("second")).await.unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[tokio::test]
    async fn append_to_a_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = WordStore::new(dir.path());
        let result = store.append(&w("nope")).await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[tokio::test]
    async fn concurrent_appends_keep_every_line() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(WordStore::new(dir.path().join("words.txt")));
        let words = ["one", "two", "three", "four", "five", "six"];

        let handles: Vec<_> = words
            .iter()
            .map(|raw| {
                let store = std::sync::Arc::clone(&store);
                let word = w(raw);
                tokio::spawn(async move { store.append(&word).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let loaded = store.load_all().await;
        assert_eq!(loaded.len(), words.len());
    }

    #[tokio::test]
    async fn compaction_sorts_and_dedupes() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, "pear\napple\n\npear\nfig\napple\n");

        let written = store.compact_sorted().await.unwrap();

        assert_eq!(written, 3);
        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "apple\nfig\npear\n");
    }

    #[tokio::test]
    async fn compaction_keeps_lines_loading_would_skip() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, "Zebra\nrock'n'roll\n  apple \nZebra\n");

        let written = store.compact_sorted().await.unwrap();

        assert_eq!(written, 3);
        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "Zebra\napple\nrock'n'roll\n");
        let texts: Vec<String> = store
            .load_all()
            .await
            .into_iter()
            .map(Word::into_inner)
            .collect();
        assert_eq!(texts, vec!["apple", "zebra"]);
    }

    #[tokio::test]
    async fn appended_words_survive_a_reload() {
        let dir = TempDir::new().unwrap();
        let store = WordStore::new(dir.path().join("words.txt"));
        let mut accepted = Vec::new();
        for raw in ["Listen", "\u{130}stanbul", "\u{c4}rger", "stra\u{df}e", "ca t"] {
            if let Ok(word) = Word::parse(raw) {
                store.append(&word).await.unwrap();
                accepted.push(word);
            }
        }

        let reloaded = store.load_all().await;
        assert_eq!(reloaded.len(), accepted.len());
        assert!(accepted.iter().all(|word| reloaded.contains(word)));
    }

    #[tokio::test]
    async fn interrupted_compaction_leaves_original_untouched() {
        let dir = TempDir::new().unwrap();
        let original = "pear\napple\npear\n";
        let store = store_with(&dir, original);

        let staged = store.stage_compaction().unwrap();
        let temp_path = staged.temp_path().to_path_buf();
        assert!(temp_path.exists());
        assert_eq!(staged.word_count(), 2);

        // Simulate a crash between writing the copy and replacing the original.
        drop(staged);

        assert!(!temp_path.exists());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), original);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn staged_compaction_commits() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, "b\na\n");

        let staged = store.stage_compaction().unwrap();
        assert_eq!(staged.commit().unwrap(), 2);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "a\nb\n");
    }

    #[tokio::test]
    async fn compaction_of_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let store = WordStore::new(dir.path().join("absent.txt"));
        assert!(matches!(
            store.compact_sorted().await,
            Err(StoreError::Io { .. })
        ));
    }
}
