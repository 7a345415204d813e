//! Batch injection
//!
//! Discovers the data files of a project, loads the side-car tables they
//! share, and writes every file on a bounded worker pool. Files are
//! independent: a failure is recorded against its file name and category and
//! the remaining files are still written.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::compression::ScriptCompressor;
use crate::config::InjectConfig;
use crate::error::{Error, Result};
use crate::graph::GraphCodec;
use crate::translation::{ScrambleMode, TRANSLATED_SUFFIX, TranslationTable, load_aligned, read_sidecar_lines};
use crate::writers::{Category, FileReport, Injector};

/// Side-car stem of the table shared by all map event lists.
pub const MAPS_STEM: &str = "maps";
/// Side-car stem of the map display-name table.
pub const NAMES_STEM: &str = "names";
/// Side-car stem of the system table.
pub const SYSTEM_STEM: &str = "system";
/// Side-car stem of the translated scripts.
pub const SCRIPTS_STEM: &str = "scripts";
/// Side-car stem of the plugin parameter table.
pub const PLUGINS_STEM: &str = "plugins";

/// A data file and its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    pub path: PathBuf,
    pub category: Category,
}

impl DataFile {
    /// Classify a path by its file name.
    #[must_use]
    pub fn detect(path: &Path) -> Option<Self> {
        let filename = path.file_name()?.to_str()?;
        Category::detect(filename).map(|category| Self {
            path: path.to_path_buf(),
            category,
        })
    }

    /// File name without extension, used as the side-car stem.
    #[must_use]
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    #[must_use]
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Find the data files directly inside `dir`, sorted by path.
///
/// Files without a translatable category are left out.
pub fn find_data_files<P: AsRef<Path>>(dir: P) -> Vec<DataFile> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.path().is_file())
        .filter_map(|e| DataFile::detect(e.path()))
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// A table loaded once for several files. A load failure is kept so every
/// file that needs the table can report it.
type Shared<T> = std::result::Result<T, String>;

/// Tables shared across files of a project.
#[derive(Debug, Clone)]
pub struct ProjectTables {
    maps: Shared<TranslationTable>,
    names: Shared<TranslationTable>,
    system: Shared<TranslationTable>,
    scripts: Shared<Vec<String>>,
    plugins: Shared<TranslationTable>,
}

impl ProjectTables {
    /// Load the shared side-car tables from `dir`.
    ///
    /// Translated scripts are positional and never scrambled.
    #[must_use]
    pub fn load(dir: &Path, scramble: ScrambleMode) -> Self {
        let table = |stem: &str| load_aligned(dir, stem, scramble).map_err(|e| e.to_string());
        let scripts_path = dir.join(format!("{SCRIPTS_STEM}{TRANSLATED_SUFFIX}"));

        Self {
            maps: table(MAPS_STEM),
            names: table(NAMES_STEM),
            system: table(SYSTEM_STEM),
            scripts: read_sidecar_lines(&scripts_path).map_err(|e| e.to_string()),
            plugins: table(PLUGINS_STEM),
        }
    }

    /// Tables supplied directly, e.g. by an external extraction step.
    #[must_use]
    pub fn from_tables(
        maps: TranslationTable,
        names: TranslationTable,
        system: TranslationTable,
        scripts: Vec<String>,
        plugins: TranslationTable,
    ) -> Self {
        Self {
            maps: Ok(maps),
            names: Ok(names),
            system: Ok(system),
            scripts: Ok(scripts),
            plugins: Ok(plugins),
        }
    }

    pub fn maps(&self) -> Result<&TranslationTable> {
        shared(MAPS_STEM, &self.maps)
    }

    pub fn names(&self) -> Result<&TranslationTable> {
        shared(NAMES_STEM, &self.names)
    }

    pub fn system(&self) -> Result<&TranslationTable> {
        shared(SYSTEM_STEM, &self.system)
    }

    pub fn scripts(&self) -> Result<&[String]> {
        shared(SCRIPTS_STEM, &self.scripts).map(Vec::as_slice)
    }

    pub fn plugins(&self) -> Result<&TranslationTable> {
        shared(PLUGINS_STEM, &self.plugins)
    }
}

fn shared<'a, T>(category: &str, table: &'a Shared<T>) -> Result<&'a T> {
    table.as_ref().map_err(|message| Error::SharedTable {
        category: category.to_string(),
        message: message.clone(),
    })
}

/// Progress of a batch, reported once per file as it starts.
#[derive(Debug, Clone)]
pub struct WriteProgress {
    pub current: usize,
    pub total: usize,
    pub filename: String,
}

/// A file that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub filename: String,
    pub category: Category,
    pub error: String,
}

/// Result of a batch write.
#[derive(Debug, Clone, Default)]
pub struct BatchWriteResult {
    /// Number of files written
    pub success_count: usize,
    /// Number of files that failed
    pub fail_count: usize,
    /// Reports of written files, in input order
    pub reports: Vec<FileReport>,
    /// Failed files, in input order
    pub failures: Vec<FileFailure>,
}

impl BatchWriteResult {
    /// Total substitutions across written files.
    #[must_use]
    pub fn substituted(&self) -> usize {
        self.reports.iter().map(|r| r.stats.substituted).sum()
    }
}

/// Write a single file according to its category.
///
/// Other-category files load their own side-car pair from `sidecar_dir`.
///
/// # Errors
/// Returns the first error hit while loading tables or writing the file.
pub fn write_file<C: GraphCodec, Z: ScriptCompressor>(
    injector: &Injector<C, Z>,
    file: &DataFile,
    sidecar_dir: &Path,
    tables: &ProjectTables,
    config: &InjectConfig,
) -> Result<FileReport> {
    match file.category {
        Category::Map => injector.write_map(&file.path, tables.maps()?, tables.names()?),
        Category::Other => {
            let stem = file.stem();
            let table = load_aligned(sidecar_dir, &stem, config.write.scramble)?;
            injector.write_other(&file.path, &table, &config.rules_for(&stem))
        }
        Category::System => injector.write_system(&file.path, tables.system()?),
        Category::Scripts => injector.write_scripts(&file.path, tables.scripts()?),
        Category::Plugins => injector.write_plugins(&file.path, tables.plugins()?, &config.plugins),
    }
}

/// Write files in parallel on a pool of `config.write.jobs` threads.
///
/// # Errors
/// Returns an error only if the worker pool cannot be built; per-file errors
/// are collected in the result.
pub fn write_batch<C, Z, F>(
    injector: &Injector<C, Z>,
    files: &[DataFile],
    sidecar_dir: &Path,
    tables: &ProjectTables,
    config: &InjectConfig,
    progress: F,
) -> Result<BatchWriteResult>
where
    C: GraphCodec,
    Z: ScriptCompressor,
    F: Fn(&WriteProgress) + Send + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.write.jobs)
        .build()?;

    let processed = AtomicUsize::new(0);
    let total = files.len();

    let outcomes: Vec<std::result::Result<FileReport, FileFailure>> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                progress(&WriteProgress {
                    current,
                    total,
                    filename: file.filename(),
                });

                write_file(injector, file, sidecar_dir, tables, config).map_err(|e| {
                    tracing::error!("Failed to write {} ({}): {e}", file.filename(), file.category);
                    FileFailure {
                        filename: file.filename(),
                        category: file.category,
                        error: e.to_string(),
                    }
                })
            })
            .collect()
    });

    let mut result = BatchWriteResult::default();
    for outcome in outcomes {
        match outcome {
            Ok(report) => result.reports.push(report),
            Err(failure) => result.failures.push(failure),
        }
    }
    result.success_count = result.reports.len();
    result.fail_count = result.failures.len();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_data_files() {
        let temp = TempDir::new().unwrap();
        for name in ["Map001.json", "MapInfos.json", "Items.json", "System.json", "notes.txt", "Tilesets.json"] {
            fs::write(temp.path().join(name), "[]").unwrap();
        }
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("Map002.json"), "{}").unwrap();

        let files = find_data_files(temp.path());
        let names: Vec<(String, Category)> = files.iter().map(|f| (f.filename(), f.category)).collect();
        assert_eq!(
            names,
            vec![
                ("Items.json".to_string(), Category::Other),
                ("Map001.json".to_string(), Category::Map),
                ("System.json".to_string(), Category::System),
            ]
        );
    }

    #[test]
    fn test_missing_shared_table_is_reported() {
        let temp = TempDir::new().unwrap();
        let tables = ProjectTables::load(temp.path(), ScrambleMode::Off);

        match tables.maps() {
            Err(Error::SharedTable { category, message }) => {
                assert_eq!(category, MAPS_STEM);
                assert!(message.contains("maps.txt"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(tables.scripts().is_err());
    }

    #[test]
    fn test_load_shared_tables() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("system.txt"), "Gold\n").unwrap();
        fs::write(temp.path().join("system_trans.txt"), "Or\n").unwrap();
        fs::write(temp.path().join("scripts_trans.txt"), "p 1\\np 2\n").unwrap();

        let tables = ProjectTables::load(temp.path(), ScrambleMode::Off);
        assert_eq!(tables.system().unwrap().get("Gold"), Some("Or"));
        assert_eq!(tables.scripts().unwrap(), ["p 1\np 2".to_string()]);
    }
}
