//! The `Scripts` file
//!
//! A scripts file is a sequence of `[id, name, code]` triples where `code` is
//! compressed source text. Replacement is positional: triple *i* receives
//! translated script *i*, whatever its current content.

use std::path::Path;

use super::{Category, FileReport, Injector, PassStats, file_name};
use crate::compression::ScriptCompressor;
use crate::error::{Error, Result};
use crate::graph::{GraphCodec, Value};

/// Slot of the compressed source in a script triple.
const CODE_SLOT: usize = 2;

/// Source text of a translated script line with engine line endings.
///
/// Remaining literal `\n` escapes are expanded, then every line break becomes
/// `\r\n`.
#[must_use]
pub fn script_source(line: &str) -> String {
    line.replace("\\n", "\n").replace("\r\n", "\n").replace('\n', "\r\n")
}

/// Replace the code of every script with the compressed translated text at the
/// same position.
///
/// Binary name fields are decoded to text on the way.
///
/// # Errors
/// Returns [`Error::AlignmentMismatch`] if there are fewer translated scripts
/// than scripts, [`Error::InvalidGraph`] if the graph is not a sequence of
/// triples, or a compression error.
pub fn translate_scripts(
    graph: &mut Value,
    translated: &[String],
    compressor: &dyn ScriptCompressor,
    file: &str,
) -> Result<PassStats> {
    let scripts = graph
        .as_array_mut()
        .ok_or_else(|| Error::InvalidGraph(format!("{file}: scripts data is not a sequence")))?;

    if translated.len() < scripts.len() {
        return Err(Error::AlignmentMismatch {
            file: file.to_string(),
            original: scripts.len(),
            translated: translated.len(),
        });
    }
    if translated.len() > scripts.len() {
        tracing::warn!(
            "{file}: {} translated scripts for {} scripts, extra lines ignored",
            translated.len(),
            scripts.len()
        );
    }

    for (index, (script, text)) in scripts.iter_mut().zip(translated).enumerate() {
        let triple = script
            .as_array_mut()
            .filter(|triple| triple.len() > CODE_SLOT)
            .ok_or_else(|| Error::InvalidGraph(format!("{file}: script {index} is not an [id, name, code] triple")))?;

        for slot in &mut triple[..CODE_SLOT] {
            if let Value::Bytes(bytes) = slot {
                *slot = Value::Str(String::from_utf8_lossy(bytes).into_owned());
            }
        }

        triple[CODE_SLOT] = Value::Bytes(compressor.compress(&script_source(text))?);
    }

    Ok(PassStats {
        merged: 0,
        substituted: scripts.len(),
    })
}

impl<C: GraphCodec, Z: ScriptCompressor> Injector<C, Z> {
    /// Write the scripts file from positionally aligned translated scripts.
    ///
    /// # Errors
    /// Returns an error on misalignment, invalid shape, or any I/O failure.
    pub fn write_scripts(&self, path: &Path, translated: &[String]) -> Result<FileReport> {
        let filename = file_name(path)?;
        let mut graph = self.read_graph(path)?;

        let stats = translate_scripts(&mut graph, translated, self.compressor(), &filename)?;

        let output = self.persist(&filename, &graph)?;
        Ok(FileReport::new(filename, Category::Scripts, output, stats))
    }
}
