//! Paragraph merge
//!
//! The editor stores a message box as one `401` command per visible line.
//! Translation tables are keyed by whole paragraphs, so before substitution
//! every maximal run of consecutive `401` commands is collapsed into its first
//! command, whose text becomes the run's lines joined with `\n`.

use super::walk::{self, EventSource};
use super::{EventCommand, command_code, command_first_text, opcode};
use crate::graph::{Dialect, Value};

/// Scan state of the merger.
enum MergeState {
    Idle,
    InRun { head: Value, lines: Vec<String> },
}

/// Collapse runs of `401` commands.
///
/// The head command of each run keeps every other field (indent, extra
/// parameters); the follow-on commands are dropped. A run that reaches the end
/// of the list is flushed like any other. Applying this to an already merged
/// list returns it unchanged.
#[must_use]
pub fn merge_commands(commands: Vec<Value>, dialect: Dialect) -> Vec<Value> {
    let mut merged = Vec::with_capacity(commands.len());
    let mut state = MergeState::Idle;

    for command in commands {
        let line = run_line(&command, dialect);

        state = match (state, line) {
            (MergeState::Idle, Some(line)) => MergeState::InRun {
                head: command,
                lines: vec![line],
            },
            (MergeState::InRun { head, mut lines }, Some(line)) => {
                lines.push(line);
                MergeState::InRun { head, lines }
            }
            (MergeState::InRun { head, lines }, None) => {
                merged.push(close_run(head, &lines, dialect));
                merged.push(command);
                MergeState::Idle
            }
            (MergeState::Idle, None) => {
                merged.push(command);
                MergeState::Idle
            }
        };
    }

    if let MergeState::InRun { head, lines } = state {
        merged.push(close_run(head, &lines, dialect));
    }

    merged
}

/// Text line of a command that belongs to a run, if it does.
fn run_line(command: &Value, dialect: Dialect) -> Option<String> {
    if command_code(command, dialect) != Some(opcode::SHOW_TEXT_LINE) {
        return None;
    }
    command_first_text(command, dialect).map(str::to_owned)
}

fn close_run(mut head: Value, lines: &[String], dialect: Dialect) -> Value {
    if lines.len() == 1 {
        return head;
    }
    if let Some(mut command) = EventCommand::from_value(&mut head, dialect) {
        command.set_first_text(lines.join("\n"));
    }
    head
}

/// Merge one command list in place. Returns the number of commands removed.
pub fn merge_list(list: &mut Vec<Value>, dialect: Dialect) -> usize {
    let before = list.len();
    *list = merge_commands(std::mem::take(list), dialect);
    before - list.len()
}

/// Merge every `event → pages → list` of a map graph.
///
/// Events that are nil or lack `pages` are skipped.
pub fn merge_map(graph: &mut Value, dialect: Dialect) -> usize {
    walk::map_events_mut(graph, dialect)
        .into_iter()
        .flat_map(|event| walk::command_lists_mut(event, dialect, EventSource::AllPages))
        .map(|list| merge_list(list, dialect))
        .sum()
}

/// Merge every command list of an Other-category graph.
///
/// Each entry contributes its `pages → list` lists when it has `pages`, or its
/// own `list` otherwise. Entries with neither are skipped.
pub fn merge_other(graph: &mut Value, dialect: Dialect) -> usize {
    let mut removed = 0;
    for (_, entry) in walk::entries_mut(graph) {
        let source = EventSource::detect(entry, dialect);
        for list in walk::command_lists_mut(entry, dialect, source) {
            removed += merge_list(list, dialect);
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::command;
    use crate::graph::{Field, Node};
    use pretty_assertions::assert_eq;

    const D: Dialect = Dialect::Json;

    fn text(code: i64, line: &str) -> Value {
        command(code, vec![line.into()], D)
    }

    #[test]
    fn test_merges_run_before_terminator() {
        let merged = merge_commands(
            vec![text(401, "A"), text(401, "B"), text(402, "C")],
            D,
        );
        assert_eq!(merged, vec![text(401, "A\nB"), text(402, "C")]);
    }

    #[test]
    fn test_trailing_run_is_flushed() {
        let merged = merge_commands(
            vec![text(101, ""), text(401, "one"), text(401, "two"), text(401, "three")],
            D,
        );
        assert_eq!(merged, vec![text(101, ""), text(401, "one\ntwo\nthree")]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let input = vec![
            text(101, ""),
            text(401, "A"),
            text(401, "B"),
            text(0, ""),
            text(401, "C"),
            text(102, "x"),
            text(401, "D"),
            text(401, "E"),
        ];
        let once = merge_commands(input, D);
        let twice = merge_commands(once.clone(), D);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 6);
    }

    #[test]
    fn test_head_keeps_other_fields() {
        let head: Value = Node::new()
            .field("code", 401_i64)
            .field("indent", 2_i64)
            .field("parameters", vec![Value::from("A"), Value::Int(9)])
            .into();
        let merged = merge_commands(vec![head, text(401, "B")], D);

        let node = merged[0].as_node().unwrap();
        assert_eq!(node.get(Field::Parameters, D).unwrap().as_array().unwrap()[1], Value::Int(9));
        assert_eq!(node.fields["indent"], Value::Int(2));
        assert_eq!(command_first_text(&merged[0], D), Some("A\nB"));
    }

    #[test]
    fn test_non_text_401_breaks_run() {
        let odd = command(401, vec![Value::Int(5)], D);
        let merged = merge_commands(vec![text(401, "A"), odd.clone(), text(401, "B")], D);
        assert_eq!(merged, vec![text(401, "A"), odd, text(401, "B")]);
    }

    #[test]
    fn test_merge_map_skips_missing_pages() {
        let page: Value = Node::new()
            .field("list", vec![text(401, "Hi"), text(401, "there"), text(0, "")])
            .into();
        let event: Value = Node::new().field("pages", vec![page]).into();
        let no_pages: Value = Node::new().field("name", "EV002").into();
        let mut map: Value = Node::new()
            .field("displayName", "Town")
            .field("events", vec![Value::Nil, event, no_pages])
            .into();

        assert_eq!(merge_map(&mut map, D), 1);
        assert_eq!(merge_map(&mut map, D), 0);
    }

    #[test]
    fn test_merge_other_uses_pages_or_list() {
        let common: Value = Node::new()
            .field("list", vec![text(401, "a"), text(401, "b")])
            .into();
        let page: Value = Node::new()
            .field("list", vec![text(401, "c"), text(401, "d"), text(401, "e")])
            .into();
        let troop: Value = Node::new().field("pages", vec![page]).into();
        let item: Value = Node::new().field("name", "Potion").into();
        let mut graph = Value::Array(vec![Value::Nil, common, troop, item]);

        assert_eq!(merge_other(&mut graph, D), 3);
    }

    #[test]
    fn test_header_slot_is_not_merged() {
        let header: Value = Node::new()
            .field("list", vec![text(401, "a"), text(401, "b")])
            .into();
        let mut graph = Value::Array(vec![header.clone()]);
        assert_eq!(merge_other(&mut graph, D), 0);
        assert_eq!(graph, Value::Array(vec![header]));
    }
}
