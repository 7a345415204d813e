//! Symbolic field names and their per-engine spellings

use serde::{Deserialize, Serialize};

/// Prefix that Marshal-to-JSON bridges put in front of symbol keys.
pub const SYMBOL_PREFIX: &str = "__symbol__";

/// A field of a game data node, named independently of how a given engine
/// spells it on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Code,
    Parameters,
    List,
    Pages,
    Events,
    DisplayName,
    Name,
    Nickname,
    Description,
    Note,
    SkillTypes,
    WeaponTypes,
    ArmorTypes,
    EquipTypes,
    CurrencyUnit,
    Elements,
    GameTitle,
    Terms,
}

/// The key spelling used by a family of data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MV/MZ JSON data: camelCase keys (`displayName`).
    #[default]
    Json,
    /// XP/VX/VX Ace Marshal data: instance variable keys (`@display_name`).
    Ivar,
}

impl Dialect {
    /// Canonical key for `field` in this dialect.
    #[must_use]
    pub fn key(self, field: Field) -> &'static str {
        match self {
            Dialect::Json => match field {
                Field::Code => "code",
                Field::Parameters => "parameters",
                Field::List => "list",
                Field::Pages => "pages",
                Field::Events => "events",
                Field::DisplayName => "displayName",
                Field::Name => "name",
                Field::Nickname => "nickname",
                Field::Description => "description",
                Field::Note => "note",
                Field::SkillTypes => "skillTypes",
                Field::WeaponTypes => "weaponTypes",
                Field::ArmorTypes => "armorTypes",
                Field::EquipTypes => "equipTypes",
                Field::CurrencyUnit => "currencyUnit",
                Field::Elements => "elements",
                Field::GameTitle => "gameTitle",
                Field::Terms => "terms",
            },
            Dialect::Ivar => match field {
                Field::Code => "@code",
                Field::Parameters => "@parameters",
                Field::List => "@list",
                Field::Pages => "@pages",
                Field::Events => "@events",
                Field::DisplayName => "@display_name",
                Field::Name => "@name",
                Field::Nickname => "@nickname",
                Field::Description => "@description",
                Field::Note => "@note",
                Field::SkillTypes => "@skill_types",
                Field::WeaponTypes => "@weapon_types",
                Field::ArmorTypes => "@armor_types",
                Field::EquipTypes => "@equip_types",
                Field::CurrencyUnit => "@currency_unit",
                Field::Elements => "@elements",
                Field::GameTitle => "@game_title",
                Field::Terms => "@terms",
            },
        }
    }

    /// Other keys accepted for `field`. XP stores its terms as `@words`.
    fn aliases(self, field: Field) -> &'static [&'static str] {
        match (self, field) {
            (Dialect::Ivar, Field::Terms) => &["@words"],
            _ => &[],
        }
    }

    /// Whether a stored key names `field`.
    ///
    /// Ivar keys are compared by symbol description: `@code`,
    /// `__symbol__@code` and `__symbol__code` all name [`Field::Code`].
    #[must_use]
    pub fn matches(self, field: Field, key: &str) -> bool {
        let mut wanted = std::iter::once(self.key(field)).chain(self.aliases(field).iter().copied());
        match self {
            Dialect::Json => wanted.any(|name| key == name),
            Dialect::Ivar => match key.strip_prefix(SYMBOL_PREFIX) {
                Some(symbol) => wanted.any(|name| symbol == name || symbol == name.trim_start_matches('@')),
                None => wanted.any(|name| key == name),
            },
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "mv" | "mz" => Ok(Dialect::Json),
            "ivar" | "marshal" | "xp" | "vx" | "vxace" => Ok(Dialect::Ivar),
            _ => Err(format!("Invalid dialect '{s}'. Valid values: json/mv/mz, ivar/marshal/xp/vx/vxace")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ivar_matches_symbol_prefix() {
        assert!(Dialect::Ivar.matches(Field::Code, "@code"));
        assert!(Dialect::Ivar.matches(Field::Code, "__symbol__@code"));
        assert!(!Dialect::Ivar.matches(Field::Code, "code"));
    }

    #[test]
    fn test_ivar_matches_bare_symbol() {
        assert!(Dialect::Ivar.matches(Field::DisplayName, "__symbol__display_name"));
        assert!(Dialect::Ivar.matches(Field::Parameters, "__symbol__parameters"));
        assert!(!Dialect::Ivar.matches(Field::DisplayName, "display_name"));
        assert!(!Dialect::Ivar.matches(Field::Name, "__symbol__nickname"));
    }

    #[test]
    fn test_xp_words_alias() {
        assert!(Dialect::Ivar.matches(Field::Terms, "@terms"));
        assert!(Dialect::Ivar.matches(Field::Terms, "@words"));
        assert!(Dialect::Ivar.matches(Field::Terms, "__symbol__words"));
        assert!(!Dialect::Json.matches(Field::Terms, "words"));
    }

    #[test]
    fn test_json_is_exact() {
        assert!(Dialect::Json.matches(Field::DisplayName, "displayName"));
        assert!(!Dialect::Json.matches(Field::DisplayName, "display_name"));
    }

    #[test]
    fn test_parse_dialect() {
        assert_eq!("MZ".parse::<Dialect>(), Ok(Dialect::Json));
        assert_eq!("vxace".parse::<Dialect>(), Ok(Dialect::Ivar));
        assert!("rpg".parse::<Dialect>().is_err());
    }
}
