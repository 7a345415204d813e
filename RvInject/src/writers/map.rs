//! Map files (`MapNNN`)

use std::path::Path;

use super::{Category, FileReport, Injector, PassStats, file_name, substitute_field};
use crate::compression::ScriptCompressor;
use crate::error::Result;
use crate::event::dispatch::translate_commands;
use crate::event::merge::merge_map;
use crate::event::walk::{self, EventSource};
use crate::graph::{Dialect, Field, GraphCodec, Value};
use crate::translation::TranslationTable;

/// Translate a decoded map graph in place.
///
/// The display name goes through `names`; every event command list is merged
/// and then substituted through `events`.
pub fn translate_map(
    graph: &mut Value,
    events: &TranslationTable,
    names: &TranslationTable,
    dialect: Dialect,
) -> PassStats {
    let mut stats = PassStats::default();

    if let Some(map) = graph.as_node_mut() {
        stats.substituted += usize::from(substitute_field(map, Field::DisplayName, dialect, names));
    }

    stats.merged = merge_map(graph, dialect);

    for event in walk::map_events_mut(graph, dialect) {
        for list in walk::command_lists_mut(event, dialect, EventSource::AllPages) {
            stats.substituted += translate_commands(list, events, dialect);
        }
    }

    stats
}

impl<C: GraphCodec, Z: ScriptCompressor> Injector<C, Z> {
    /// Write one map file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, decoded, encoded or written.
    pub fn write_map(&self, path: &Path, events: &TranslationTable, names: &TranslationTable) -> Result<FileReport> {
        let filename = file_name(path)?;
        let mut graph = self.read_graph(path)?;

        let stats = translate_map(&mut graph, events, names, self.dialect());

        let output = self.persist(&filename, &graph)?;
        Ok(FileReport::new(filename, Category::Map, output, stats))
    }
}
