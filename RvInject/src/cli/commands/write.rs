//! CLI command for writing a translated project

use std::path::Path;
use std::time::Instant;

use super::WriteArgs;
use crate::batch::{DataFile, ProjectTables, find_data_files, write_batch};
use crate::cli::progress::{DISK, DOCUMENT, LOOKING_GLASS, file_bar, print_done, print_step};
use crate::config::InjectConfig;
use crate::graph::JsonCodec;
use crate::writers::{Injector, WriteOptions};

pub fn execute(args: &WriteArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    let project_dir = args.data.parent().unwrap_or(Path::new("."));
    let mut config = InjectConfig::discover(args.config.as_deref(), project_dir)?;
    apply_overrides(&mut config, args);

    print_step(1, 3, LOOKING_GLASS, "Scanning data files...");
    let mut files = find_data_files(&args.data);
    if let Some(plugins) = &args.plugins {
        let Some(file) = DataFile::detect(plugins) else {
            anyhow::bail!("Not a plugins file: {}", plugins.display());
        };
        files.push(file);
    }

    if files.is_empty() {
        println!("No data files found in: {}", args.data.display());
        return Ok(());
    }

    print_step(2, 3, DOCUMENT, "Loading side-car tables...");
    let tables = ProjectTables::load(&args.sidecar, config.write.scramble);

    print_step(3, 3, DISK, &format!("Writing {} files...", files.len()));
    let codec = if config.write.pretty {
        JsonCodec::pretty()
    } else {
        JsonCodec::new()
    };
    let injector = Injector::new(codec, &args.output, WriteOptions::from(&config.write));

    // Per-file log lines replace the bar
    let pb = file_bar(files.len() as u64, args.quiet || config.write.log);
    let result = write_batch(&injector, &files, &args.sidecar, &tables, &config, |progress| {
        pb.set_position(progress.current as u64);
        pb.set_message(progress.filename.clone());
    })?;
    pb.finish_and_clear();

    println!();
    println!("Write complete:");
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);
    println!("  Substitutions: {}", result.substituted());

    if result.fail_count > 0 {
        println!();
        println!("Failures:");
        for failure in &result.failures {
            println!("  {} ({}): {}", failure.filename, failure.category, failure.error);
        }
    }

    print_done(start.elapsed());

    if result.fail_count > 0 {
        anyhow::bail!("{} file(s) could not be written", result.fail_count);
    }
    Ok(())
}

fn apply_overrides(config: &mut InjectConfig, args: &WriteArgs) {
    if let Some(dialect) = args.dialect {
        config.write.dialect = dialect;
    }
    if let Some(scramble) = args.scramble {
        config.write.scramble = scramble;
    }
    if let Some(jobs) = args.jobs {
        config.write.jobs = jobs;
    }
    if let Some(prefix) = &args.log_prefix {
        config.write.log_prefix.clone_from(prefix);
    }
    config.write.pretty |= args.pretty;
    config.write.log |= args.log;
}
