//! Backup command handlers
//!
//! Export writes the whole collection to a JSON document; import restores
//! one wholesale after a schema-checked parse. Reset wipes every slot.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use boook_core::backup::{export_backup, parse_backup, restore_backup};
use boook_core::{BookStore, Profile};

use crate::editor::confirm;
use crate::output::Output;

/// Export the collection to a backup document
pub fn export(
    store: &BookStore,
    profile: &Profile,
    path: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let path = path.unwrap_or_else(|| {
        PathBuf::from(format!("boook-backup-{}.json", Utc::now().format("%Y-%m-%d")))
    });

    let document = export_backup(store, profile).context("Failed to serialize backup")?;
    fs::write(&path, document)
        .with_context(|| format!("Failed to write backup to {:?}", path))?;

    output.success(&format!(
        "Exported {} book(s) to {}",
        store.books().len(),
        path.display()
    ));
    Ok(())
}

/// Restore a backup document, replacing the current collection
pub fn import(
    store: &mut BookStore,
    profile: &Profile,
    path: PathBuf,
    output: &Output,
) -> Result<()> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read backup from {:?}", path))?;

    let document = match parse_backup(&content) {
        Ok(document) => document,
        Err(e) => bail!(
            "{:?} is not a valid boook backup: {}\nNothing was imported.",
            path,
            e
        ),
    };

    if output.should_prompt() {
        println!(
            "Importing {} book(s); this replaces the current {} book(s).",
            document.books.len(),
            store.books().len()
        );
        if !confirm("Continue?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let imported = document.books.len();
    restore_backup(document, store, profile);

    output.success(&format!("Imported {} book(s)", imported));
    Ok(())
}

/// Wipe all stored data
pub fn reset(profile: &Profile, output: &Output) -> Result<()> {
    if output.should_prompt() {
        println!("This erases ALL data: books, goals, lists, and profile.");
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
        if !confirm("Last chance - everything will be lost. Continue?")? {
            println!("Cancelled.");
            return Ok(());
        }
    } else {
        // Destructive resets require an interactive confirmation
        bail!("Refusing to reset without confirmation. Run without --json/--quiet.");
    }

    profile.clear_all_data();

    output.success("All data erased");
    Ok(())
}
