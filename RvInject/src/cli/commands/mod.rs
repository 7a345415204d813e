use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::graph::Dialect;
use crate::translation::ScrambleMode;

pub mod execute;
pub mod list;
pub mod merge;
pub mod write;

/// Which merge walk to apply to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    /// `events → pages → list`
    Map,
    /// Entries with `pages → list` or `list`
    Other,
}

impl FromStr for MergeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "map" | "maps" => Ok(MergeKind::Map),
            "other" | "database" | "db" => Ok(MergeKind::Other),
            _ => Err(format!("Invalid merge kind '{s}'. Valid values: map, other")),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write translated data files into an output directory
    Write(WriteArgs),

    /// Merge dialogue paragraphs of a single file without translating it
    Merge {
        /// Source data file
        #[arg(short, long)]
        source: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Key dialect of the data (json, ivar)
        #[arg(long, default_value = "json")]
        dialect: Dialect,

        /// Walk to use (map, other); detected from the file name if omitted
        #[arg(short, long)]
        kind: Option<MergeKind>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// List translatable data files grouped by category
    List {
        /// Data directory
        #[arg(short, long)]
        data: PathBuf,

        /// Side-car directory; reports which files have their text files
        #[arg(short, long)]
        sidecar: Option<PathBuf>,
    },
}

/// Arguments of `rvinject write`
#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    /// Directory with the original data files
    #[arg(short, long)]
    pub data: PathBuf,

    /// Directory with the side-car text files
    #[arg(short, long)]
    pub sidecar: PathBuf,

    /// Output directory
    #[arg(short, long)]
    pub output: PathBuf,

    /// Path to plugins.js, written alongside the data files
    #[arg(long)]
    pub plugins: Option<PathBuf>,

    /// Config file (default: rvinject.toml in the project, then the user config)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Key dialect of the data (json, ivar)
    #[arg(long)]
    pub dialect: Option<Dialect>,

    /// Scramble translated lines (off, lines, words)
    #[arg(long)]
    pub scramble: Option<ScrambleMode>,

    /// Worker threads (0 = one per core)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Pretty-print encoded JSON
    #[arg(long)]
    pub pretty: bool,

    /// Log every written file
    #[arg(long)]
    pub log: bool,

    /// Prefix of the per-file log line
    #[arg(long)]
    pub log_prefix: Option<String>,

    /// Suppress progress bar
    #[arg(short, long)]
    pub quiet: bool,
}
