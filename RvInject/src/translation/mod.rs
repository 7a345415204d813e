//! Exact-match translation tables
//!
//! A [`TranslationTable`] maps the untouched original text, exactly as it
//! appears in the decoded graph, to its translation. Tables are built once and
//! then only read, so they can be shared across worker threads by reference.

mod scramble;
mod sidecar;

pub use scramble::{ScrambleMode, scramble, scramble_with};
pub use sidecar::{
    ORIGINAL_SUFFIX, TRANSLATED_SUFFIX, load_aligned, read_sidecar_lines, sidecar_paths, unescape_line,
};

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Original text → translated text, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: IndexMap<String, String>,
}

impl TranslationTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from positionally aligned original/translated lines.
    ///
    /// Line *i* of `original` is the key for line *i* of `translated`. A later
    /// duplicate key overwrites the value of an earlier one but keeps its
    /// position.
    ///
    /// # Errors
    /// Returns [`Error::AlignmentMismatch`] when the line counts differ.
    pub fn from_aligned(file: &str, original: Vec<String>, translated: Vec<String>) -> Result<Self> {
        if original.len() != translated.len() {
            return Err(Error::AlignmentMismatch {
                file: file.to_string(),
                original: original.len(),
                translated: translated.len(),
            });
        }

        Ok(original.into_iter().zip(translated).collect())
    }

    /// Look up the translation of `original`.
    ///
    /// A blank translated line means the entry is not translated yet and is
    /// reported as a miss.
    #[must_use]
    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries
            .get(original)
            .map(String::as_str)
            .filter(|translated| !translated.is_empty())
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, original: impl Into<String>, translated: impl Into<String>) {
        self.entries.insert(original.into(), translated.into());
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(original, translated)` pairs in insertion order, blank
    /// translations included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Substitute `text` in place if the table has an entry for it.
///
/// Returns `true` when a substitution happened. A miss leaves `text` as it was.
pub fn substitute(table: &TranslationTable, text: &mut String) -> bool {
    match table.get(text) {
        Some(translated) => {
            *text = translated.to_string();
            true
        }
        None => false,
    }
}
