//! Reading list command handlers

use anyhow::{bail, Result};
use std::collections::HashSet;
use uuid::Uuid;

use boook_core::{Book, BookStore};

use crate::commands::book::parse_book_id;
use crate::editor::confirm;
use crate::output::Output;

/// Create an empty reading list
pub fn create(store: &mut BookStore, name: String, output: &Output) -> Result<()> {
    if name.trim().is_empty() {
        bail!("List name must not be empty.");
    }

    let id = store.create_reading_list(name.trim());

    output.success(&format!("Created list: {}", id));
    Ok(())
}

/// Show all reading lists
pub fn list_all(store: &BookStore, output: &Output) -> Result<()> {
    output.print_reading_lists(store.reading_lists());
    Ok(())
}

/// Show one list with its books, in list order
///
/// References to books that were deleted since are filtered out here.
pub fn show(store: &BookStore, id: String, output: &Output) -> Result<()> {
    let uuid = parse_list_id(&id, store)?;

    let list = store
        .reading_list(uuid)
        .ok_or_else(|| anyhow::anyhow!("List not found: {}", id))?;

    let books: Vec<&Book> = list
        .books
        .iter()
        .filter_map(|book_id| store.book(*book_id))
        .collect();

    output.print_reading_list(list, &books);
    Ok(())
}

/// Rename a list
pub fn rename(store: &mut BookStore, id: String, name: String, output: &Output) -> Result<()> {
    if name.trim().is_empty() {
        bail!("List name must not be empty.");
    }

    let uuid = parse_list_id(&id, store)?;
    if store.reading_list(uuid).is_none() {
        bail!("List not found: {}", id);
    }

    store.rename_reading_list(uuid, name.trim());

    output.success("List renamed");
    Ok(())
}

/// Delete a list
pub fn delete(store: &mut BookStore, id: String, output: &Output) -> Result<()> {
    let uuid = parse_list_id(&id, store)?;

    let list = store
        .reading_list(uuid)
        .ok_or_else(|| anyhow::anyhow!("List not found: {}", id))?;

    if output.should_prompt() {
        println!("Delete list: {} ({} book(s))", list.name, list.books.len());
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete_reading_list(uuid);

    output.success(&format!("Deleted list: {}", uuid));
    Ok(())
}

/// Add a book to a list
pub fn add_book(
    store: &mut BookStore,
    list_id: String,
    book_id: String,
    output: &Output,
) -> Result<()> {
    let list_uuid = parse_list_id(&list_id, store)?;
    let book_uuid = parse_book_id(&book_id, store)?;

    let list = store
        .reading_list(list_uuid)
        .ok_or_else(|| anyhow::anyhow!("List not found: {}", list_id))?;
    if store.book(book_uuid).is_none() {
        bail!("Book not found: {}", book_id);
    }
    if list.books.contains(&book_uuid) {
        output.message("The book is already in that list.");
        return Ok(());
    }

    store.add_book_to_list(list_uuid, book_uuid);

    output.success("Book added to list");
    Ok(())
}

/// Remove a book from a list
pub fn remove_book(
    store: &mut BookStore,
    list_id: String,
    book_id: String,
    output: &Output,
) -> Result<()> {
    let list_uuid = parse_list_id(&list_id, store)?;
    let book_uuid = parse_book_id(&book_id, store)?;

    if store.reading_list(list_uuid).is_none() {
        bail!("List not found: {}", list_id);
    }

    store.remove_book_from_list(list_uuid, book_uuid);

    output.success("Book removed from list");
    Ok(())
}

/// Replace a list's ordering with the supplied sequence
///
/// The store takes whatever ordering it is handed, so the permutation check
/// happens here: the new sequence must contain exactly the current members.
pub fn reorder(
    store: &mut BookStore,
    list_id: String,
    book_ids: Vec<String>,
    output: &Output,
) -> Result<()> {
    let list_uuid = parse_list_id(&list_id, store)?;

    let current: Vec<Uuid> = store
        .reading_list(list_uuid)
        .ok_or_else(|| anyhow::anyhow!("List not found: {}", list_id))?
        .books
        .clone();

    let new_order = book_ids
        .iter()
        .map(|id| parse_book_id(id, store))
        .collect::<Result<Vec<_>>>()?;

    let current_set: HashSet<_> = current.iter().collect();
    let new_set: HashSet<_> = new_order.iter().collect();
    if current_set != new_set || current.len() != new_order.len() {
        bail!(
            "The new ordering must contain exactly the current {} book(s) of the list.",
            current.len()
        );
    }

    store.reorder_list(list_uuid, new_order);

    output.success("List reordered");
    Ok(())
}

/// Parse a list ID (supports full UUID or prefix)
fn parse_list_id(id: &str, store: &BookStore) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    let matches: Vec<_> = store
        .reading_lists()
        .iter()
        .filter(|l| l.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No list found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple lists match '{}':", id);
            for list in &matches {
                eprintln!("  {} - {}", list.id, list.name);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
