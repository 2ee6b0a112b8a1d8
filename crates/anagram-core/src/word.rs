//! Validated words and their anagram signatures.
//!
//! A [`Word`] can only be built through [`Word::parse`], so holding one
//! means the text is nonempty, purely alphabetic, and lowercase. Its
//! [`Signature`] is the same letters sorted, which is the key every
//! anagram of the word shares.

use std::fmt;

use crate::error::LookupError;

/// A nonempty, alphabetic, lowercase word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    /// Validate and canonicalize raw input.
    ///
    /// Surrounding whitespace is not trimmed: `" cat"` is rejected the
    /// same way `"c4t"` is. Both the input and its lowercase form must be
    /// purely alphabetic, since lowercasing can introduce combining marks
    /// (`İ` becomes `i` + U+0307) that would not parse back from the word
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidInput`] if `raw` is empty or either
    /// form contains a non-alphabetic character.
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let lower = raw.to_lowercase();
        if raw.is_empty()
            || !raw.chars().all(char::is_alphabetic)
            || !lower.chars().all(char::is_alphabetic)
        {
            return Err(LookupError::InvalidInput(raw.to_owned()));
        }
        Ok(Self(lower))
    }

    /// The canonical lowercase text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the word, returning its text.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Compute the anagram signature of this word.
    pub fn signature(&self) -> Signature {
        let mut letters: Vec<char> = self.0.chars().collect();
        letters.sort_unstable();
        Signature(letters.into_iter().collect())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The sorted letters of a word: the anagram group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(String);
