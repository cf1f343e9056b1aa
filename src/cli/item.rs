//! Item commands: show, flags, export, scan

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use super::output::Output;
use crate::domain::Item;
use crate::storage::{Archive, Config, ItemLoader, Loaded};

fn load(output: &Output, loader: &ItemLoader, path: &Path) -> Result<Loaded> {
    output.verbose_ctx("load", &format!("Loading item from: {}", path.display()));

    let loaded = loader
        .load_from_directory(path)
        .with_context(|| format!("Failed to load item: {}", path.display()))?;

    for warning in &loaded.warnings {
        output.warning(&warning.to_string());
    }

    Ok(loaded)
}

/// Prints an item
pub fn show(output: &Output, loader: &ItemLoader, path: &Path) -> Result<()> {
    let loaded = load(output, loader, path)?;
    let item = &loaded.item;

    if output.is_json() {
        output.data(&json!({
            "item": item.to_json(),
            "directory": item.directory().map(|p| p.display().to_string()),
            "metaFilepath": item.meta_filepath().map(|p| p.display().to_string()),
            "allFlags": item.get_all_flags(),
            "warnings": loaded.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    print_item(item);
    Ok(())
}

fn print_item(item: &Item) {
    println!("{}", item.title());
    println!("{}", "=".repeat(item.title().chars().count().max(1)));
    println!();
    println!("Author:      {}", item.author());
    println!("Date:        {}", item.date());
    if let Some(version) = item.version() {
        println!("Schema:      {}", version);
    }
    if let Some(classification) = item.classification() {
        println!("Class:       {}", classification);
    }
    if let Some(source) = item.source_file() {
        println!("Source:      {}", source.display());
    }
    println!();
    println!("{}", item.description());

    if let Some(related) = item.related_files() {
        if !related.is_empty() {
            println!();
            println!("Related files:");
            for file in related {
                match file.id() {
                    Some(id) => println!("  [{}] {}", id, file),
                    None => println!("  {}", file),
                }
            }
        }
    }

    let flags = item.get_all_flags();
    if !flags.is_empty() {
        println!();
        println!("Flags: {}", flags.into_iter().collect::<Vec<_>>().join(", "));
    }
}

/// Prints the combined flag set of an item
pub fn flags(output: &Output, loader: &ItemLoader, path: &Path) -> Result<()> {
    let loaded = load(output, loader, path)?;
    let flags = loaded.item.get_all_flags();

    if output.is_json() {
        output.data(&flags);
    } else {
        for flag in flags {
            println!("{}", flag);
        }
    }

    Ok(())
}

/// Prints an item as a v2 descriptor
pub fn export(output: &Output, loader: &ItemLoader, path: &Path) -> Result<()> {
    let loaded = load(output, loader, path)?;
    output.data(&loaded.item.to_json());
    Ok(())
}

/// Lists every item under an archive root
pub fn scan(
    output: &Output,
    loader: &ItemLoader,
    config: &Config,
    root: Option<PathBuf>,
) -> Result<()> {
    let root = root
        .or_else(|| config.archive_root.clone())
        .ok_or_else(|| anyhow::anyhow!("No archive root given and none configured"))?;

    output.verbose_ctx("scan", &format!("Scanning archive at: {}", root.display()));
    let archive = Archive::open(&root, loader.clone())
        .with_context(|| format!("Failed to open archive: {}", root.display()))?;

    let entries = archive.scan();
    let failures = entries.iter().filter(|e| e.result.is_err()).count();
    output.verbose_ctx(
        "scan",
        &format!("Found {} meta files, {} failed", entries.len(), failures),
    );

    if output.is_json() {
        let rows: Vec<_> = entries
            .iter()
            .map(|entry| match &entry.result {
                Ok(loaded) => json!({
                    "meta": entry.meta_path.display().to_string(),
                    "ok": true,
                    "title": loaded.item.title(),
                    "deprecated": loaded.is_deprecated(),
                }),
                Err(e) => json!({
                    "meta": entry.meta_path.display().to_string(),
                    "ok": false,
                    "error": e.to_string(),
                }),
            })
            .collect();
        output.data(&rows);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No items found under {}", archive.root().display());
        return Ok(());
    }

    println!("{:<8} {:<40} META", "STATUS", "TITLE");
    println!("{}", "-".repeat(70));
    for entry in &entries {
        match &entry.result {
            Ok(loaded) => {
                let status = if loaded.is_deprecated() { "v1" } else { "ok" };
                println!(
                    "{:<8} {:<40} {}",
                    status,
                    loaded.item.title(),
                    entry.meta_path.display()
                );
            }
            Err(e) => {
                println!("{:<8} {:<40} {}", "error", e, entry.meta_path.display());
            }
        }
    }

    println!();
    println!("{} item(s), {} failed", entries.len() - failures, failures);
    Ok(())
}
