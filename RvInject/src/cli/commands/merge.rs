//! CLI command for running only the paragraph merge on one file

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::MergeKind;
use crate::cli::progress::{GEAR, print_step};
use crate::event::merge::{merge_map, merge_other};
use crate::graph::{Dialect, GraphCodec, JsonCodec};
use crate::writers::Category;

pub fn execute(
    source: &Path,
    output: &Path,
    dialect: Dialect,
    kind: Option<MergeKind>,
    pretty: bool,
) -> anyhow::Result<()> {
    let kind = kind.unwrap_or_else(|| detect_kind(source));
    let codec = if pretty { JsonCodec::pretty() } else { JsonCodec::new() };

    let bytes = fs::read(source).with_context(|| format!("Failed to read {}", source.display()))?;
    let mut graph = codec.decode(&bytes)?;

    print_step(1, 1, GEAR, &format!("Merging {} ({kind:?})...", source.display()));
    let removed = match kind {
        MergeKind::Map => merge_map(&mut graph, dialect),
        MergeKind::Other => merge_other(&mut graph, dialect),
    };

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, codec.encode(&graph)?)?;

    println!("Merged away {removed} command(s): {}", output.display());
    Ok(())
}

fn detect_kind(source: &Path) -> MergeKind {
    let category = source
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(Category::detect);
    match category {
        Some(Category::Map) => MergeKind::Map,
        _ => MergeKind::Other,
    }
}
