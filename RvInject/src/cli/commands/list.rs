//! CLI command for listing the translatable files of a project

use std::collections::BTreeMap;
use std::path::Path;

use crate::batch::{DataFile, find_data_files};
use crate::translation::sidecar_paths;
use crate::writers::Category;

pub fn execute(data: &Path, sidecar: Option<&Path>) -> anyhow::Result<()> {
    let files = find_data_files(data);

    if files.is_empty() {
        println!("No data files found in: {}", data.display());
        return Ok(());
    }

    let mut by_category: BTreeMap<Category, Vec<&DataFile>> = BTreeMap::new();
    for file in &files {
        by_category.entry(file.category).or_default().push(file);
    }

    for (category, files) in &by_category {
        println!("{category} ({}):", files.len());
        for file in files {
            match sidecar.filter(|_| *category == Category::Other) {
                Some(dir) => {
                    let (original, translated) = sidecar_paths(dir, &file.stem());
                    let status = if original.is_file() && translated.is_file() {
                        "ok"
                    } else {
                        "missing side-car"
                    };
                    println!("  {} [{status}]", file.filename());
                }
                None => println!("  {}", file.filename()),
            }
        }
    }

    println!();
    println!("Total: {} files", files.len());
    Ok(())
}
