//! `plugins.js`
//!
//! The file is a JavaScript assignment wrapping a JSON array of plugin
//! descriptors. The text around the array is kept byte for byte; the array is
//! re-serialized after substitution.

use std::fs;
use std::path::Path;

use serde_json::Value as Json;

use super::{Category, FileReport, Injector, PassStats, file_name};
use crate::compression::ScriptCompressor;
use crate::config::PluginSettings;
use crate::error::{Error, Result};
use crate::graph::GraphCodec;
use crate::translation::TranslationTable;

/// `plugins.js` split around its plugin array.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginsFile {
    /// Text before the array (`var $plugins =\n`).
    pub prefix: String,
    pub plugins: Vec<Json>,
    /// Text after the array (`;\n`).
    pub suffix: String,
}

impl PluginsFile {
    /// Split and parse the file content.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGraph`] if no array is found, or a JSON error.
    pub fn parse(content: &str) -> Result<Self> {
        let (start, end) = content
            .find('[')
            .zip(content.rfind(']'))
            .filter(|(start, end)| start < end)
            .ok_or_else(|| Error::InvalidGraph("plugins.js: no plugin array found".to_string()))?;

        let plugins: Vec<Json> = serde_json::from_str(&content[start..=end])?;

        Ok(Self {
            prefix: content[..start].to_string(),
            plugins,
            suffix: content[end + 1..].to_string(),
        })
    }

    /// Render back to file content.
    ///
    /// # Errors
    /// Returns a JSON serialization error.
    pub fn render(&self) -> Result<String> {
        Ok(format!(
            "{}{}{}",
            self.prefix,
            serde_json::to_string(&self.plugins)?,
            self.suffix
        ))
    }
}

/// Translate the parameters of allow-listed plugins in place.
///
/// String parameters are looked up exactly, except the options parameter
/// (`settings.options_key` of `settings.options_plugin`), which gets every
/// table entry applied in table order as a first-occurrence replacement.
pub fn translate_plugins(plugins: &mut [Json], table: &TranslationTable, settings: &PluginSettings) -> PassStats {
    let mut substituted = 0;

    for plugin in plugins.iter_mut() {
        let Some(descriptor) = plugin.as_object_mut() else {
            continue;
        };
        let Some(name) = descriptor.get("name").and_then(Json::as_str).map(str::to_owned) else {
            continue;
        };
        if !settings.is_allowed(&name) {
            continue;
        }
        let Some(parameters) = descriptor.get_mut("parameters").and_then(Json::as_object_mut) else {
            continue;
        };

        let is_options_plugin = name == settings.options_plugin;
        for (key, value) in parameters.iter_mut() {
            let Json::String(text) = value else {
                continue;
            };

            if is_options_plugin && *key == settings.options_key {
                let replaced = table
                    .iter()
                    .filter(|(_, translated)| !translated.is_empty())
                    .fold(text.clone(), |acc, (original, translated)| acc.replacen(original, translated, 1));
                if replaced != *text {
                    *text = replaced;
                    substituted += 1;
                }
            } else if let Some(translated) = table.get(text) {
                *text = translated.to_string();
                substituted += 1;
            }
        }
    }

    PassStats {
        merged: 0,
        substituted,
    }
}

impl<C: GraphCodec, Z: ScriptCompressor> Injector<C, Z> {
    /// Write `plugins.js`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or written.
    pub fn write_plugins(
        &self,
        path: &Path,
        table: &TranslationTable,
        settings: &PluginSettings,
    ) -> Result<FileReport> {
        let filename = file_name(path)?;
        let mut file = PluginsFile::parse(&fs::read_to_string(path)?)?;

        let stats = translate_plugins(&mut file.plugins, table, settings);

        let output = self.write_output(&filename, file.render()?.as_bytes())?;
        Ok(FileReport::new(filename, Category::Plugins, output, stats))
    }
}
