//! Traversal of the nested structures that hold command lists
//!
//! Map files hold `events → pages → list`; Other files hold a top-level
//! sequence whose slot 0 is a header placeholder, followed by entries that are
//! either simple entities or carry `pages → list` / `list`.

use serde::{Deserialize, Serialize};

use crate::graph::{Dialect, Field, Node, Value};

/// Where an event-bearing entry keeps its command lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventSource {
    /// The entry's own `list` (one implicit page).
    EntryList,
    /// The `list` of every page in `pages`.
    AllPages,
}

impl EventSource {
    /// `AllPages` if the entry has `pages`, `EntryList` otherwise.
    #[must_use]
    pub fn detect(entry: &Node, dialect: Dialect) -> Self {
        if entry.get(Field::Pages, dialect).is_some() {
            Self::AllPages
        } else {
            Self::EntryList
        }
    }
}

/// Event nodes of a map graph.
///
/// `events` may be a sequence (with nil holes) or a mapping from event id to
/// event. Nil and non-object events are skipped, as is a missing `events`.
pub fn map_events_mut(graph: &mut Value, dialect: Dialect) -> Vec<&mut Node> {
    let Some(events) = graph
        .as_node_mut()
        .and_then(|map| map.get_mut(Field::Events, dialect))
    else {
        return Vec::new();
    };

    match events {
        Value::Array(items) => items.iter_mut().filter_map(Value::as_node_mut).collect(),
        Value::Object(by_id) => by_id.fields.values_mut().filter_map(Value::as_node_mut).collect(),
        _ => Vec::new(),
    }
}

/// Entries of an Other-category graph, with their index, header slot skipped.
pub fn entries_mut(graph: &mut Value) -> impl Iterator<Item = (usize, &mut Node)> {
    graph
        .as_array_mut()
        .into_iter()
        .flat_map(|items| items.iter_mut().enumerate().skip(1))
        .filter_map(|(index, entry)| entry.as_node_mut().map(|node| (index, node)))
}

/// Command lists of an event or entry.
pub fn command_lists_mut(node: &mut Node, dialect: Dialect, source: EventSource) -> Vec<&mut Vec<Value>> {
    match source {
        EventSource::EntryList => node
            .get_mut(Field::List, dialect)
            .and_then(Value::as_array_mut)
            .into_iter()
            .collect(),
        EventSource::AllPages => node
            .get_mut(Field::Pages, dialect)
            .and_then(Value::as_array_mut)
            .into_iter()
            .flat_map(|pages| pages.iter_mut())
            .filter_map(Value::as_node_mut)
            .filter_map(|page| page.get_mut(Field::List, dialect).and_then(Value::as_array_mut))
            .collect(),
    }
}
