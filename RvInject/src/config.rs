//! Injection settings (`rvinject.toml`)
//!
//! ```toml
//! [write]
//! dialect = "json"
//! log = true
//! log_prefix = "Written"
//! jobs = 4
//! scramble = "off"
//!
//! [plugins]
//! allow = ["YEP_ItemCore"]
//!
//! [categories.Classes]
//! note = "lookup"
//!
//! [categories.Items]
//! note = { tags = ["<Menu Category: Items>"] }
//!
//! [categories.Troops]
//! events = "all-pages"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::walk::EventSource;
use crate::graph::Dialect;
use crate::translation::ScrambleMode;

/// File name looked up in the project and user config directories.
pub const CONFIG_FILE_NAME: &str = "rvinject.toml";

fn default_log_prefix() -> String {
    "Written".to_string()
}

fn default_allowed_plugins() -> Vec<String> {
    [
        "YEP_BattleEngineCore",
        "YEP_OptionsCore",
        "SRD_NameInputUpgrade",
        "YEP_KeyboardConfig",
        "YEP_ItemCore",
        "YEP_X_ItemDiscard",
        "YEP_EquipCore",
        "YEP_ItemSynthesis",
        "ARP_CommandIcons",
        "YEP_X_ItemCategories",
        "Olivia_OctoBattle",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_options_plugin() -> String {
    "YEP_OptionsCore".to_string()
}

fn default_options_key() -> String {
    "OptionsCategories".to_string()
}

fn default_menu_tags() -> Vec<String> {
    [
        "<Menu Category: Items>",
        "<Menu Category: Food>",
        "<Menu Category: Healing>",
        "<Menu Category: Body bag>",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// The full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectConfig {
    #[serde(default)]
    pub write: WriteSettings,
    #[serde(default)]
    pub plugins: PluginSettings,
    /// Per-category overrides, keyed by file stem (`Items`, `Troops`, ...).
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryRules>,
}

/// `[write]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteSettings {
    #[serde(default)]
    pub dialect: Dialect,
    /// Pretty-print encoded JSON output.
    #[serde(default)]
    pub pretty: bool,
    /// Emit one `<prefix> <filename>` line per written file.
    #[serde(default)]
    pub log: bool,
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    /// Worker threads, 0 for one per core.
    #[serde(default)]
    pub jobs: usize,
    #[serde(default)]
    pub scramble: ScrambleMode,
}

impl Default for WriteSettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            pretty: false,
            log: false,
            log_prefix: default_log_prefix(),
            jobs: 0,
            scramble: ScrambleMode::default(),
        }
    }
}

/// `[plugins]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Plugins whose parameters are translated.
    #[serde(default = "default_allowed_plugins")]
    pub allow: Vec<String>,
    /// Plugin whose `options_key` parameter gets sequential in-text replacement.
    #[serde(default = "default_options_plugin")]
    pub options_plugin: String,
    #[serde(default = "default_options_key")]
    pub options_key: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            allow: default_allowed_plugins(),
            options_plugin: default_options_plugin(),
            options_key: default_options_key(),
        }
    }
}

impl PluginSettings {
    #[must_use]
    pub fn is_allowed(&self, plugin: &str) -> bool {
        self.allow.iter().any(|name| name == plugin)
    }
}

/// What happens to the `note` field of a simple entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteRule {
    /// Left untouched.
    #[default]
    Ignore,
    /// Whole-note exact lookup.
    Lookup,
    /// Every listed tag found in the note is replaced by its translation.
    Tags(Vec<String>),
}

/// Rules for one Other-category file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryRules {
    #[serde(default)]
    pub note: NoteRule,
    /// Set for event-bearing categories; their entries are walked as command
    /// lists instead of simple entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<EventSource>,
}

impl CategoryRules {
    /// Built-in rules for a file stem.
    #[must_use]
    pub fn builtin(stem: &str) -> Self {
        match stem {
            "Classes" => Self {
                note: NoteRule::Lookup,
                events: None,
            },
            "Items" => Self {
                note: NoteRule::Tags(default_menu_tags()),
                events: None,
            },
            "CommonEvents" => Self {
                note: NoteRule::Ignore,
                events: Some(EventSource::EntryList),
            },
            "Troops" => Self {
                note: NoteRule::Ignore,
                events: Some(EventSource::AllPages),
            },
            _ => Self::default(),
        }
    }
}

impl InjectConfig {
    /// Rules for an Other-category stem: configured, else built in.
    #[must_use]
    pub fn rules_for(&self, stem: &str) -> CategoryRules {
        self.categories
            .get(stem)
            .cloned()
            .unwrap_or_else(|| CategoryRules::builtin(stem))
    }

    /// Load a config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save to a config file, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// User-level config path (`<config dir>/rvinject/rvinject.toml`).
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rvinject").join(CONFIG_FILE_NAME))
    }

    /// Resolve the config to use.
    ///
    /// An explicit path must exist. Otherwise `rvinject.toml` in
    /// `project_dir`, then the user config, then the defaults.
    ///
    /// # Errors
    /// Returns an error if a config file is found but cannot be loaded.
    pub fn discover(explicit: Option<&Path>, project_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidates = std::iter::once(project_dir.join(CONFIG_FILE_NAME)).chain(Self::user_config_path());
        for path in candidates {
            if path.is_file() {
                tracing::debug!("Using config {}", path.display());
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_roundtrip() {
        let mut config = InjectConfig::default();
        config.write.dialect = Dialect::Ivar;
        config.write.scramble = ScrambleMode::Words;
        config.categories.insert(
            "Weapons".to_string(),
            CategoryRules {
                note: NoteRule::Tags(vec!["<Tag>".to_string()]),
                events: None,
            },
        );

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: InjectConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_partial_file() {
        let config: InjectConfig = toml::from_str(
            r#"
            [write]
            log = true

            [categories.Armors]
            note = "lookup"

            [categories.Items]
            note = { tags = ["<Menu Category: Keys>"] }

            [categories.Quests]
            events = "entry-list"
            "#,
        )
        .unwrap();

        assert!(config.write.log);
        assert_eq!(config.write.log_prefix, "Written");
        assert!(config.plugins.is_allowed("YEP_ItemCore"));
        assert_eq!(config.rules_for("Armors").note, NoteRule::Lookup);
        assert_eq!(
            config.rules_for("Items").note,
            NoteRule::Tags(vec!["<Menu Category: Keys>".to_string()])
        );
        assert_eq!(config.rules_for("Quests").events, Some(EventSource::EntryList));
    }

    #[test]
    fn test_builtin_rules() {
        let config = InjectConfig::default();
        assert_eq!(config.rules_for("Classes").note, NoteRule::Lookup);
        assert_eq!(config.rules_for("Skills"), CategoryRules::default());
        assert_eq!(config.rules_for("Troops").events, Some(EventSource::AllPages));
        assert_eq!(config.rules_for("CommonEvents").events, Some(EventSource::EntryList));
        assert!(matches!(config.rules_for("Items").note, NoteRule::Tags(tags) if tags.len() == 4));
    }

    #[test]
    fn test_discover_prefers_explicit_then_project() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        let explicit = temp.path().join("custom.toml");

        let mut in_project = InjectConfig::default();
        in_project.write.jobs = 3;
        in_project.save(&project.join(CONFIG_FILE_NAME)).unwrap();

        let mut custom = InjectConfig::default();
        custom.write.jobs = 7;
        custom.save(&explicit).unwrap();

        assert_eq!(InjectConfig::discover(Some(&explicit), &project).unwrap().write.jobs, 7);
        assert_eq!(InjectConfig::discover(None, &project).unwrap().write.jobs, 3);
        assert!(InjectConfig::discover(Some(&temp.path().join("missing.toml")), &project).is_err());
    }
}
