//! Side-car text files
//!
//! Each Other-category data file `<stem>.<ext>` is paired with two UTF-8
//! files in the side-car directory: `<stem>.txt` (original lines) and
//! `<stem>_trans.txt` (translated lines), aligned line by line. Multi-line
//! entries are stored with literal `\n` / `\r\n` escapes.

use std::fs;
use std::path::{Path, PathBuf};

use super::{ScrambleMode, TranslationTable, scramble};
use crate::error::{Error, Result};

/// Suffix of the original-lines file.
pub const ORIGINAL_SUFFIX: &str = ".txt";
/// Suffix of the translated-lines file.
pub const TRANSLATED_SUFFIX: &str = "_trans.txt";

/// Paths of the original and translated side-car files for `stem`.
#[must_use]
pub fn sidecar_paths(dir: &Path, stem: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{stem}{ORIGINAL_SUFFIX}")),
        dir.join(format!("{stem}{TRANSLATED_SUFFIX}")),
    )
}

/// Expand literal `\r\n` and `\n` escapes into real line breaks.
#[must_use]
pub fn unescape_line(line: &str) -> String {
    line.replace("\\r\\n", "\r\n").replace("\\n", "\n")
}

/// Read a side-car file into unescaped lines.
///
/// # Errors
/// Returns [`Error::SidecarMissing`] if the file does not exist.
pub fn read_sidecar_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::SidecarMissing {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })?;

    Ok(content.lines().map(unescape_line).collect())
}

/// Load an aligned side-car pair into a translation table.
///
/// The scramble mode is applied to the translated lines only, so keys are
/// never affected.
///
/// # Errors
/// Returns an error if either file is missing or the line counts differ.
pub fn load_aligned(dir: &Path, stem: &str, mode: ScrambleMode) -> Result<TranslationTable> {
    let (original_path, translated_path) = sidecar_paths(dir, stem);

    let original = read_sidecar_lines(&original_path)?;
    let mut translated = read_sidecar_lines(&translated_path)?;

    if original.len() != translated.len() {
        return Err(Error::AlignmentMismatch {
            file: stem.to_string(),
            original: original.len(),
            translated: translated.len(),
        });
    }

    scramble(&mut translated, mode);

    tracing::debug!("Loaded {} side-car lines for {}", original.len(), stem);
    TranslationTable::from_aligned(stem, original, translated)
}
