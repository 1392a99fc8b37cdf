//! CLI command for validating catalogs

use std::path::PathBuf;
use std::time::Instant;

use crate::batch::{check_files, find_ts_files};
use crate::cli::progress::{print_done, simple_bar};
use crate::lifecycle::Severity;

/// Parse and validate catalogs, failing on errors (or warnings with `strict`)
pub fn execute(paths: &[PathBuf], strict: bool, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(find_ts_files(path));
        } else {
            files.push(path.clone());
        }
    }

    if files.is_empty() {
        println!("No .ts files found");
        return Ok(());
    }

    let pb = (!quiet).then(|| simple_bar(files.len() as u64, "Checking"));
    let result = check_files(&files, |progress| {
        if let Some(pb) = &pb {
            pb.set_position(progress.current as u64);
        }
    });
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    for summary in &result.checked {
        for issue in &summary.issues {
            if quiet && issue.severity == Severity::Info {
                continue;
            }
            println!("{}: {issue}", summary.path.display());
        }
    }
    for (path, error) in &result.failures {
        println!("{}: {error}", path.display());
    }

    let errors = result.count_at_least(Severity::Error);
    let warnings = result.count_at_least(Severity::Warning) - errors;

    if !quiet {
        println!();
        println!("Check complete:");
        println!("  Files:    {}", files.len());
        println!("  Failed:   {}", result.failures.len());
        println!("  Errors:   {errors}");
        println!("  Warnings: {warnings}");
        print_done(start.elapsed());
    }

    if !result.failures.is_empty() || errors > 0 || (strict && warnings > 0) {
        anyhow::bail!(
            "check failed: {} unreadable files, {errors} errors, {warnings} warnings",
            result.failures.len()
        );
    }
    Ok(())
}
