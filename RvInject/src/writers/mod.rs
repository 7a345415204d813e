//! Category writers
//!
//! Each data file belongs to one [`Category`]. A writer decodes the file with
//! the injector's [`GraphCodec`], runs the merge and substitution passes for
//! its category, encodes the graph and writes it under the same file name into
//! the output directory.
//!
//! The passes themselves are pure functions over the graph
//! ([`map::translate_map`], [`other::translate_other`], ...) so they can be
//! used without touching the file system.

pub mod map;
pub mod other;
pub mod plugins;
pub mod scripts;
pub mod system;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compression::{ScriptCompressor, ZlibCompressor};
use crate::config::WriteSettings;
use crate::error::{Error, Result};
use crate::graph::{Dialect, Field, GraphCodec, JsonCodec, Node, Value};
use crate::translation::{TranslationTable, substitute};

/// Extensions of engine data files.
pub const DATA_EXTENSIONS: &[&str] = &["json", "rvdata2", "rvdata", "rxdata"];

/// File name of the plugin list.
pub const PLUGINS_FILE: &str = "plugins.js";

/// Data file categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// `MapNNN` files.
    Map,
    /// Entity and event-bearing database files (`Items`, `Troops`, ...).
    Other,
    /// The `System` file.
    System,
    /// The `Scripts` file.
    Scripts,
    /// `plugins.js`.
    Plugins,
}

impl Category {
    /// Detect the category from a file name.
    ///
    /// Returns `None` for files that carry no translatable text
    /// (`MapInfos`, `Tilesets`, `Animations`) and for unknown extensions.
    #[must_use]
    pub fn detect(filename: &str) -> Option<Self> {
        if filename == PLUGINS_FILE {
            return Some(Self::Plugins);
        }

        let (stem, extension) = filename.rsplit_once('.')?;
        if !DATA_EXTENSIONS.contains(&extension) {
            return None;
        }

        match stem {
            "System" => Some(Self::System),
            "Scripts" => Some(Self::Scripts),
            "Tilesets" | "Animations" => None,
            _ => match stem.strip_prefix("Map") {
                Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => Some(Self::Map),
                Some(_) => None,
                None => Some(Self::Other),
            },
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Other => "other",
            Self::System => "system",
            Self::Scripts => "scripts",
            Self::Plugins => "plugins",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters of one merge + substitution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Commands removed by paragraph merging.
    pub merged: usize,
    /// Values replaced by a translation.
    pub substituted: usize,
}

/// Result of writing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub filename: String,
    pub category: Category,
    pub output: PathBuf,
    pub stats: PassStats,
}

impl FileReport {
    pub(crate) fn new(filename: String, category: Category, output: PathBuf, stats: PassStats) -> Self {
        tracing::debug!("{filename}: {} merged, {} substituted", stats.merged, stats.substituted);
        Self {
            filename,
            category,
            output,
            stats,
        }
    }
}

/// Options shared by every writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub dialect: Dialect,
    /// Emit `<log_prefix> <filename>` after each written file.
    pub log: bool,
    pub log_prefix: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::from(&WriteSettings::default())
    }
}

impl From<&WriteSettings> for WriteOptions {
    fn from(settings: &WriteSettings) -> Self {
        Self {
            dialect: settings.dialect,
            log: settings.log,
            log_prefix: settings.log_prefix.clone(),
        }
    }
}

/// Decodes, transforms and re-encodes data files into an output directory.
#[derive(Debug, Clone)]
pub struct Injector<C = JsonCodec, Z = ZlibCompressor> {
    codec: C,
    compressor: Z,
    output_dir: PathBuf,
    options: WriteOptions,
}

impl<C: GraphCodec> Injector<C, ZlibCompressor> {
    /// Injector with the default script compressor.
    pub fn new(codec: C, output_dir: impl Into<PathBuf>, options: WriteOptions) -> Self {
        Self::with_compressor(codec, ZlibCompressor::default(), output_dir, options)
    }
}

impl<C: GraphCodec, Z: ScriptCompressor> Injector<C, Z> {
    pub fn with_compressor(codec: C, compressor: Z, output_dir: impl Into<PathBuf>, options: WriteOptions) -> Self {
        Self {
            codec,
            compressor,
            output_dir: output_dir.into(),
            options,
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    pub(crate) fn dialect(&self) -> Dialect {
        self.options.dialect
    }

    pub(crate) fn compressor(&self) -> &Z {
        &self.compressor
    }

    /// Read and decode a data file.
    pub(crate) fn read_graph(&self, path: &Path) -> Result<Value> {
        let bytes = fs::read(path)?;
        self.codec.decode(&bytes)
    }

    /// Encode `graph` and write it under `filename` in the output directory.
    pub(crate) fn persist(&self, filename: &str, graph: &Value) -> Result<PathBuf> {
        let bytes = self.codec.encode(graph)?;
        self.write_output(filename, &bytes)
    }

    pub(crate) fn write_output(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(filename);
        fs::write(&path, bytes)?;

        if self.options.log {
            tracing::info!("{} {}", self.options.log_prefix, filename);
        }
        Ok(path)
    }
}

/// File name component of `path` as UTF-8.
pub(crate) fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| Error::InvalidPath(path.display().to_string()))
}

/// Substitute a string field of `node`. Non-string or absent fields are skipped.
pub(crate) fn substitute_field(node: &mut Node, field: Field, dialect: Dialect, table: &TranslationTable) -> bool {
    match node.get_mut(field, dialect) {
        Some(Value::Str(text)) => substitute(table, text),
        _ => false,
    }
}

/// Substitute every string element of a sequence. Returns the count replaced.
pub(crate) fn substitute_strings(items: &mut [Value], table: &TranslationTable) -> usize {
    items
        .iter_mut()
        .filter_map(|item| match item {
            Value::Str(text) => Some(substitute(table, text)),
            _ => None,
        })
        .filter(|hit| *hit)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_category() {
        assert_eq!(Category::detect("Map001.json"), Some(Category::Map));
        assert_eq!(Category::detect("Map012.rvdata2"), Some(Category::Map));
        assert_eq!(Category::detect("MapInfos.json"), None);
        assert_eq!(Category::detect("Items.json"), Some(Category::Other));
        assert_eq!(Category::detect("CommonEvents.rxdata"), Some(Category::Other));
        assert_eq!(Category::detect("System.json"), Some(Category::System));
        assert_eq!(Category::detect("Scripts.rvdata2"), Some(Category::Scripts));
        assert_eq!(Category::detect("Tilesets.json"), None);
        assert_eq!(Category::detect("Animations.json"), None);
        assert_eq!(Category::detect("plugins.js"), Some(Category::Plugins));
        assert_eq!(Category::detect("readme.txt"), None);
        assert_eq!(Category::detect("Items"), None);
    }

    #[test]
    fn test_substitute_strings_skips_non_strings() {
        let table: TranslationTable = [("Sword", "Schwert")].into_iter().collect();
        let mut items = vec![Value::Nil, "Sword".into(), Value::Int(3), "Axe".into()];
        assert_eq!(substitute_strings(&mut items, &table), 1);
        assert_eq!(items[1], Value::from("Schwert"));
        assert_eq!(items[3], Value::from("Axe"));
    }

    #[test]
    fn test_options_from_settings() {
        let options = WriteOptions::default();
        assert_eq!(options.log_prefix, "Written");
        assert!(!options.log);
    }
}
