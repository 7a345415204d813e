//! # RvInject
//!
//! A pure-Rust engine that writes translated text back into RPG Maker project
//! data while leaving every other part of the files intact.
//!
//! ## Pipeline
//!
//! - **Decode** - a [`GraphCodec`](graph::GraphCodec) turns a data file into a
//!   generic object graph ([`graph::Value`])
//! - **Merge** - consecutive "show text" lines become one paragraph
//!   ([`event::merge`])
//! - **Substitute** - opcode-aware exact-match lookup in a
//!   [`TranslationTable`](translation::TranslationTable) ([`event::dispatch`])
//! - **Encode** - the mutated graph is written under the same file name
//!   ([`writers`])
//!
//! ## Quick Start
//!
//! ### Translating a command list
//!
//! ```
//! use rvinject::event::command;
//! use rvinject::event::dispatch::translate_commands;
//! use rvinject::event::merge::merge_commands;
//! use rvinject::graph::{Dialect, Value};
//! use rvinject::translation::TranslationTable;
//!
//! let d = Dialect::Json;
//! let commands = vec![
//!     command(401, vec!["Hello".into()], d),
//!     command(401, vec!["world".into()], d),
//!     command(102, vec![Value::Array(vec!["Yes".into(), "No".into()])], d),
//! ];
//! let table: TranslationTable = [("Hello\nworld", "Bonjour\nmonde"), ("Yes", "Oui")]
//!     .into_iter()
//!     .collect();
//!
//! let mut commands = merge_commands(commands, d);
//! assert_eq!(translate_commands(&mut commands, &table, d), 2);
//! assert_eq!(commands.len(), 2);
//! ```
//!
//! ### Writing a whole project
//!
//! ```no_run
//! use std::path::Path;
//! use rvinject::prelude::*;
//!
//! let config = InjectConfig::discover(None, Path::new("game"))?;
//! let files = find_data_files("game/data");
//! let tables = ProjectTables::load(Path::new("game/translation"), config.write.scramble);
//! let injector = Injector::new(JsonCodec::new(), "game/output", WriteOptions::from(&config.write));
//!
//! let result = write_batch(&injector, &files, Path::new("game/translation"), &tables, &config, |_| {})?;
//! println!("{} written, {} failed", result.success_count, result.fail_count);
//! # Ok::<(), rvinject::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `rvinject` command-line binary

pub mod batch;
pub mod compression;
pub mod config;
pub mod error;
pub mod event;
pub mod graph;
pub mod translation;
pub mod writers;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    // Graph model and codec
    pub use crate::graph::{Dialect, Field, GraphCodec, JsonCodec, Node, Value};
    pub use crate::compression::{ScriptCompressor, ZlibCompressor};

    // Passes
    pub use crate::event::dispatch::{translate_command, translate_commands};
    pub use crate::event::merge::{merge_commands, merge_map, merge_other};
    pub use crate::translation::{ScrambleMode, TranslationTable, load_aligned};

    // Writers and batch processing
    pub use crate::batch::{BatchWriteResult, DataFile, ProjectTables, find_data_files, write_batch};
    pub use crate::config::{CategoryRules, InjectConfig, NoteRule};
    pub use crate::writers::{Category, FileReport, Injector, WriteOptions};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
