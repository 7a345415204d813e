//! Command execution implementations

use super::Commands;
use super::{list, merge, write};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Write(args) => write::execute(args),
            Commands::Merge {
                source,
                output,
                dialect,
                kind,
                pretty,
            } => merge::execute(source, output, *dialect, *kind, *pretty),
            Commands::List { data, sidecar } => list::execute(data, sidecar.as_deref()),
        }
    }
}
