//! Other-category database files
//!
//! Two kinds of files share this writer. Event-bearing files (`CommonEvents`,
//! `Troops`) hold command lists and go through merge and opcode dispatch.
//! Everything else is a list of simple entities whose `name`, `nickname`,
//! `description` and, per category, `note` are looked up directly. Slot 0 of the top-level
//! sequence is a header placeholder and is never touched.

use std::path::Path;

use super::{Category, FileReport, Injector, PassStats, file_name, substitute_field};
use crate::compression::ScriptCompressor;
use crate::config::{CategoryRules, NoteRule};
use crate::error::Result;
use crate::event::dispatch::translate_commands;
use crate::event::merge::merge_other;
use crate::event::walk;
use crate::graph::{Dialect, Field, GraphCodec, Node, Value};
use crate::translation::TranslationTable;

/// Translate a decoded Other-category graph in place.
pub fn translate_other(
    graph: &mut Value,
    table: &TranslationTable,
    rules: &CategoryRules,
    dialect: Dialect,
) -> PassStats {
    let merged = merge_other(graph, dialect);
    let mut substituted = 0;

    for (_, entry) in walk::entries_mut(graph) {
        substituted += match rules.events {
            Some(source) => walk::command_lists_mut(entry, dialect, source)
                .into_iter()
                .map(|list| translate_commands(list, table, dialect))
                .sum(),
            None => translate_entity(entry, table, &rules.note, dialect),
        };
    }

    PassStats { merged, substituted }
}

fn translate_entity(entry: &mut Node, table: &TranslationTable, note: &NoteRule, dialect: Dialect) -> usize {
    let mut substituted = [Field::Name, Field::Nickname, Field::Description]
        .into_iter()
        .filter(|field| substitute_field(entry, *field, dialect, table))
        .count();

    substituted += match note {
        NoteRule::Ignore => 0,
        NoteRule::Lookup => usize::from(substitute_field(entry, Field::Note, dialect, table)),
        NoteRule::Tags(tags) => match entry.get_mut(Field::Note, dialect) {
            Some(Value::Str(text)) => replace_tags(text, tags, table),
            _ => 0,
        },
    };

    substituted
}

/// Replace every occurrence of each listed tag that has a translation.
fn replace_tags(note: &mut String, tags: &[String], table: &TranslationTable) -> usize {
    let mut replaced = 0;
    for tag in tags {
        if !note.contains(tag.as_str()) {
            continue;
        }
        if let Some(translated) = table.get(tag) {
            *note = note.replace(tag.as_str(), translated);
            replaced += 1;
        }
    }
    replaced
}

impl<C: GraphCodec, Z: ScriptCompressor> Injector<C, Z> {
    /// Write one Other-category file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, decoded, encoded or written.
    pub fn write_other(&self, path: &Path, table: &TranslationTable, rules: &CategoryRules) -> Result<FileReport> {
        let filename = file_name(path)?;
        let mut graph = self.read_graph(path)?;

        let stats = translate_other(&mut graph, table, rules, self.dialect());

        let output = self.persist(&filename, &graph)?;
        Ok(FileReport::new(filename, Category::Other, output, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::command;
    use crate::event::walk::EventSource;
    use pretty_assertions::assert_eq;

    const D: Dialect = Dialect::Json;

    fn entity(name: &str, description: Value, note: &str) -> Value {
        Node::new()
            .field("id", 1_i64)
            .field("name", name)
            .field("description", description)
            .field("note", note)
            .into()
    }

    fn table() -> TranslationTable {
        [
            ("Potion", "Trank"),
            ("Heals 50 HP", "Heilt 50 KP"),
            ("<Menu Category: Food>", "<Menu Category: Essen>"),
            ("Warrior", "Krieger"),
            ("Strong\nclass", "Starke\nKlasse"),
            ("Hi", "Salut"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_simple_entities() {
        let mut graph = Value::Array(vec![
            Value::Nil,
            entity("Potion", "Heals 50 HP".into(), "<Menu Category: Food>"),
            entity("Ether", Value::Int(0), ""),
        ]);
        let rules = CategoryRules::builtin("Items");
        let stats = translate_other(&mut graph, &table(), &rules, D);

        assert_eq!(stats.substituted, 3);
        assert_eq!(
            graph,
            Value::Array(vec![
                Value::Nil,
                entity("Trank", "Heilt 50 KP".into(), "<Menu Category: Essen>"),
                entity("Ether", Value::Int(0), ""),
            ])
        );
    }

    #[test]
    fn test_note_rules_per_category() {
        let input = || Value::Array(vec![Value::Nil, entity("Warrior", "".into(), "Strong\nclass")]);

        let mut classes = input();
        translate_other(&mut classes, &table(), &CategoryRules::builtin("Classes"), D);
        assert_eq!(classes.as_array().unwrap()[1], entity("Krieger", "".into(), "Starke\nKlasse"));

        let mut actors = input();
        translate_other(&mut actors, &table(), &CategoryRules::builtin("Actors"), D);
        assert_eq!(actors.as_array().unwrap()[1], entity("Krieger", "".into(), "Strong\nclass"));
    }

    #[test]
    fn test_actor_nickname() {
        let actor: Value = Node::new()
            .field("@name", "Harold")
            .field("@nickname", "Warrior")
            .field("@note", "")
            .into();
        let mut graph = Value::Array(vec![Value::Nil, actor]);

        let stats = translate_other(&mut graph, &table(), &CategoryRules::builtin("Actors"), Dialect::Ivar);

        assert_eq!(stats.substituted, 1);
        let node = graph.as_array().unwrap()[1].as_node().unwrap();
        assert_eq!(node.get_str(Field::Nickname, Dialect::Ivar), Some("Krieger"));
        assert_eq!(node.get_str(Field::Name, Dialect::Ivar), Some("Harold"));
    }

    #[test]
    fn test_header_slot_untouched() {
        let header = entity("Potion", Value::Nil, "");
        let mut graph = Value::Array(vec![header.clone()]);
        let stats = translate_other(&mut graph, &table(), &CategoryRules::default(), D);
        assert_eq!(stats, PassStats::default());
        assert_eq!(graph, Value::Array(vec![header]));
    }

    #[test]
    fn test_event_bearing_sources() {
        let list = || vec![command(401, vec!["Hi".into()], D)];
        let page = || Value::from(Node::new().field("list", list()));
        let troop = || Value::from(Node::new().field("pages", vec![page(), page()]));
        let common = || Value::from(Node::new().field("list", list()));

        let mut troops = Value::Array(vec![Value::Nil, troop()]);
        let stats = translate_other(&mut troops, &table(), &CategoryRules::builtin("Troops"), D);
        assert_eq!(stats.substituted, 2);

        let mut commons = Value::Array(vec![Value::Nil, common(), common()]);
        let rules = CategoryRules {
            events: Some(EventSource::EntryList),
            ..CategoryRules::default()
        };
        assert_eq!(translate_other(&mut commons, &table(), &rules, D).substituted, 2);
    }
}
