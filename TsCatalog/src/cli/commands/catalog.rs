//! CLI commands for reading, editing and rewriting catalogs

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::catalog::{Catalog, CatalogStats};
use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, print_done, print_step};
use crate::formats::ts::{
    Context, Status, TranslationText, WriteOptions, read_ts, write_ts, write_ts_with_options,
};

#[derive(Serialize)]
struct StatsRow<'a> {
    file: String,
    language: Option<&'a str>,
    #[serde(flatten)]
    stats: CatalogStats,
    completion: f64,
}

/// Print message counts for each catalog
pub fn stats(files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let catalogs = files
        .iter()
        .map(|path| read_ts(path).map(|catalog| (path, catalog)))
        .collect::<Result<Vec<_>, _>>()?;

    let rows: Vec<StatsRow<'_>> = catalogs
        .iter()
        .map(|(path, catalog)| {
            let stats = catalog.statistics();
            StatsRow {
                file: path.display().to_string(),
                language: catalog.language.as_deref(),
                stats,
                completion: stats.completion(),
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        println!("{} ({})", row.file, row.language.unwrap_or("no language"));
        println!("  Contexts:   {}", row.stats.contexts);
        println!("  Finished:   {}", row.stats.finished);
        println!("  Unfinished: {}", row.stats.unfinished);
        println!("  Obsolete:   {}", row.stats.obsolete);
        println!("  Vanished:   {}", row.stats.vanished);
        println!("  Completion: {:.1}%", row.completion * 100.0);
    }
    Ok(())
}

/// Rewrite a catalog in canonical form
pub fn format(
    source: &Path,
    output: Option<&Path>,
    indent: usize,
    byte_order_mark: bool,
    doctype: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let output = output.unwrap_or(source);

    print_step(1, 2, LOOKING_GLASS, &format!("Reading {}...", source.display()));
    let catalog = read_ts(source)?;

    print_step(2, 2, DISK, &format!("Writing {}...", output.display()));
    let options = WriteOptions {
        indent,
        byte_order_mark,
        doctype,
    };
    write_ts_with_options(&catalog, output, &options)?;

    print_done(start.elapsed());
    Ok(())
}

/// Remove retired messages and empty contexts
pub fn compact(source: &Path, output: Option<&Path>, obsolete: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let output = output.unwrap_or(source);

    print_step(1, 3, LOOKING_GLASS, &format!("Reading {}...", source.display()));
    let mut catalog = read_ts(source)?;

    print_step(2, 3, GEAR, "Compacting...");
    let store = catalog.store_mut();
    let vanished = store.remove_vanished();
    let obsoleted = if obsolete { store.remove_obsolete() } else { 0 };
    let contexts_before = store.context_count();
    store.compact();
    let contexts_removed = contexts_before - store.context_count();
    println!("  Removed {vanished} vanished and {obsoleted} obsolete messages");
    println!("  Removed {contexts_removed} empty contexts");

    print_step(3, 3, DISK, &format!("Writing {}...", output.display()));
    write_ts(&catalog, output)?;

    print_done(start.elapsed());
    Ok(())
}

/// Change the status of one message
pub fn set_status(
    file: &Path,
    context: &str,
    source: &str,
    comment: Option<&str>,
    status: Status,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let mut catalog = read_ts(file)?;
    let previous = catalog
        .store_mut()
        .set_status(context, source, comment, status)?;

    if previous == status {
        println!("{context}: {source:?} is already {status}");
        return Ok(());
    }

    write_ts(&catalog, output.unwrap_or(file))?;
    println!("{context}: {source:?} {previous} -> {status}");
    Ok(())
}

/// Print catalog contents as text or JSON
pub fn dump(file: &Path, context: Option<&str>, json: bool) -> anyhow::Result<()> {
    let catalog = read_ts(file)?;
    if json {
        println!("{}", catalog.to_json(context)?);
        return Ok(());
    }

    let contexts: Vec<Context> = match context {
        Some(name) => catalog
            .store()
            .context(name)
            .map(|view| vec![view.to_context()])
            .ok_or_else(|| crate::Error::ContextNotFound(name.to_string()))?,
        None => catalog.to_contexts(),
    };

    print_header(&catalog);
    for context in &contexts {
        println!("[{}]", context.info.name);
        for message in &context.messages {
            let comment = message
                .comment
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(|c| format!(" ({c})"))
                .unwrap_or_default();
            println!("  {:<10} {:?}{}", message.status, message.source, comment);
            match &message.translation.text {
                TranslationText::Singular(text) if !text.is_empty() => {
                    println!("             -> {text:?}");
                }
                TranslationText::Singular(_) => {}
                TranslationText::Plural(forms) => {
                    for (index, form) in forms.iter().enumerate() {
                        println!("             [{index}] {:?}", form.text);
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_header(catalog: &Catalog) {
    println!(
        "TS {} language={} sourcelanguage={}",
        catalog.version,
        catalog.language.as_deref().unwrap_or("-"),
        catalog.source_language.as_deref().unwrap_or("-")
    );
}
