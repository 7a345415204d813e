//! The `System` file: type and element names, currency unit, game title and
//! terms

use std::path::Path;

use super::{Category, FileReport, Injector, PassStats, file_name, substitute_field, substitute_strings};
use crate::compression::ScriptCompressor;
use crate::error::Result;
use crate::graph::{Dialect, Field, GraphCodec, Value};
use crate::translation::{TranslationTable, substitute};

/// Parallel name lists. `equipTypes` only exists in some engines.
const NAME_LISTS: [Field; 5] = [
    Field::SkillTypes,
    Field::WeaponTypes,
    Field::ArmorTypes,
    Field::EquipTypes,
    Field::Elements,
];

/// Translate a decoded system graph in place.
///
/// Name lists are looked up element by element, the currency unit and the
/// game title as whole strings. The title is the last line of the system
/// side-car pair. Each terms category keeps its key; sequences have every
/// string substituted and mappings (the `messages` table) every string value.
pub fn translate_system(graph: &mut Value, table: &TranslationTable, dialect: Dialect) -> PassStats {
    let Some(system) = graph.as_node_mut() else {
        return PassStats::default();
    };

    let mut substituted = 0;

    for field in NAME_LISTS {
        if let Some(items) = system.get_mut(field, dialect).and_then(Value::as_array_mut) {
            substituted += substitute_strings(items, table);
        }
    }

    substituted += [Field::CurrencyUnit, Field::GameTitle]
        .into_iter()
        .filter(|field| substitute_field(system, *field, dialect, table))
        .count();

    if let Some(Value::Object(terms)) = system.get_mut(Field::Terms, dialect) {
        for value in terms.fields.values_mut() {
            substituted += translate_terms_value(value, table);
        }
    }

    PassStats {
        merged: 0,
        substituted,
    }
}

fn translate_terms_value(value: &mut Value, table: &TranslationTable) -> usize {
    match value {
        Value::Array(items) => substitute_strings(items, table),
        Value::Object(mapping) => mapping
            .fields
            .values_mut()
            .filter_map(|v| match v {
                Value::Str(text) => Some(substitute(table, text)),
                _ => None,
            })
            .filter(|hit| *hit)
            .count(),
        Value::Str(text) => usize::from(substitute(table, text)),
        _ => 0,
    }
}

impl<C: GraphCodec, Z: ScriptCompressor> Injector<C, Z> {
    /// Write the system file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, decoded, encoded or written.
    pub fn write_system(&self, path: &Path, table: &TranslationTable) -> Result<FileReport> {
        let filename = file_name(path)?;
        let mut graph = self.read_graph(path)?;

        let stats = translate_system(&mut graph, table, self.dialect());

        let output = self.persist(&filename, &graph)?;
        Ok(FileReport::new(filename, Category::System, output, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Value {
        Value::Array(items.iter().map(|s| Value::from(*s)).collect())
    }

    #[test]
    fn test_translate_system_json() {
        let mut graph: Value = Node::new()
            .field("skillTypes", vec![Value::Nil, "Magic".into(), "Special".into()])
            .field("weaponTypes", strings(&["", "Sword"]))
            .field("armorTypes", strings(&["", "Shield"]))
            .field("currencyUnit", "G")
            .field(
                "terms",
                Node::new()
                    .field("basic", strings(&["Level", "HP"]))
                    .field("commands", strings(&["Fight", "Escape"]))
                    .field(
                        "messages",
                        Node::new().field("actionFailure", "Failed!").field("alwaysDash", "Always Dash"),
                    ),
            )
            .into();

        let table: TranslationTable = [
            ("Magic", "Magie"),
            ("Sword", "Schwert"),
            ("G", "Gold"),
            ("Level", "Stufe"),
            ("Escape", "Flucht"),
            ("Failed!", "Fehlgeschlagen!"),
        ]
        .into_iter()
        .collect();

        let stats = translate_system(&mut graph, &table, Dialect::Json);
        assert_eq!(stats.substituted, 6);

        let system = graph.as_node().unwrap();
        assert_eq!(system.get_str(Field::CurrencyUnit, Dialect::Json), Some("Gold"));
        assert_eq!(system.fields["skillTypes"], Value::Array(vec![Value::Nil, "Magie".into(), "Special".into()]));

        let terms = system.get(Field::Terms, Dialect::Json).unwrap().as_node().unwrap();
        let keys: Vec<&str> = terms.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["basic", "commands", "messages"]);
        assert_eq!(terms.fields["basic"], strings(&["Stufe", "HP"]));
        assert_eq!(
            terms.fields["messages"].as_node().unwrap().fields["actionFailure"],
            Value::from("Fehlgeschlagen!")
        );
    }

    #[test]
    fn test_translate_system_ivar_equip_types() {
        let mut graph: Value = Node::with_class("RPG::System")
            .field("@equip_types", strings(&["", "Weapon", "Head"]))
            .field("@terms", Node::with_class("RPG::System::Terms").field("@etypes", strings(&["Weapon"])))
            .into();
        let table: TranslationTable = [("Weapon", "Arme")].into_iter().collect();

        let stats = translate_system(&mut graph, &table, Dialect::Ivar);
        assert_eq!(stats.substituted, 2);
    }

    #[test]
    fn test_elements_and_game_title() {
        let mut graph: Value = Node::new()
            .field("gameTitle", "Dark Quest")
            .field("elements", strings(&["", "Fire", "Ice"]))
            .into();
        let table: TranslationTable = [("Fire", "Feuer"), ("Dark Quest", "Dunkle Suche")].into_iter().collect();

        let stats = translate_system(&mut graph, &table, Dialect::Json);

        assert_eq!(stats.substituted, 2);
        let system = graph.as_node().unwrap();
        assert_eq!(system.get_str(Field::GameTitle, Dialect::Json), Some("Dunkle Suche"));
        assert_eq!(system.fields["elements"], strings(&["", "Feuer", "Ice"]));
    }

    #[test]
    fn test_xp_words_terms() {
        let mut graph: Value = Node::with_class("RPG::System")
            .field("__symbol__game_title", "Dark Quest")
            .field(
                "__symbol__words",
                Node::with_class("RPG::System::Words").field("__symbol__attack", "Attack"),
            )
            .into();
        let table: TranslationTable = [("Attack", "Angriff"), ("Dark Quest", "")].into_iter().collect();

        let stats = translate_system(&mut graph, &table, Dialect::Ivar);

        assert_eq!(stats.substituted, 1);
        let system = graph.as_node().unwrap();
        assert_eq!(system.get_str(Field::GameTitle, Dialect::Ivar), Some("Dark Quest"));
        let words = system.get(Field::Terms, Dialect::Ivar).unwrap().as_node().unwrap();
        assert_eq!(words.fields["__symbol__attack"], Value::from("Angriff"));
    }

    #[test]
    fn test_non_object_system_is_skipped() {
        let mut graph = Value::Array(vec![]);
        assert_eq!(translate_system(&mut graph, &TranslationTable::new(), Dialect::Json), PassStats::default());
    }
}
