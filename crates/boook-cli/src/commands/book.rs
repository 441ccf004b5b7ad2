//! Book command handlers

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use boook_core::{BookFilters, BookPatch, BookStore, NewBook, Ownership, ReadingStatus};

use crate::editor::{confirm, edit_text};
use crate::lookup;
use crate::output::Output;

/// Search the lookup service and catalog the picked candidate
pub async fn add(
    store: &mut BookStore,
    query: String,
    pick: usize,
    owned: bool,
    status: Option<ReadingStatus>,
    output: &Output,
) -> Result<()> {
    if status.is_some() && !owned {
        bail!("A reading status only applies to owned books. Add --owned.");
    }

    let max_results = store.config().max_search_results;
    let mut candidates = lookup::search(&query, max_results).await;

    if candidates.is_empty() {
        bail!("No books found for '{}'. Check the query or try again later.", query);
    }
    if pick == 0 || pick > candidates.len() {
        bail!(
            "--pick {} is out of range; the search returned {} candidate(s).",
            pick,
            candidates.len()
        );
    }

    let ownership = if owned {
        Ownership::Owned
    } else {
        Ownership::WantToHave
    };

    // Search results can carry truncated metadata; prefer the full record
    let picked = candidates.swap_remove(pick - 1);
    let volume = lookup::volume(&picked.id).await.unwrap_or(picked);

    let id = store.add_book(volume.into_new_book(ownership, status));

    output.success(&format!("Added book: {}", id));
    if let Some(book) = store.book(id) {
        output.print_book(book);
    }

    Ok(())
}

/// Catalog a book from manually entered metadata
#[allow(clippy::too_many_arguments)]
pub fn new_manual(
    store: &mut BookStore,
    title: String,
    authors: Vec<String>,
    pages: Option<u32>,
    categories: Vec<String>,
    isbn: Option<String>,
    owned: bool,
    status: Option<ReadingStatus>,
    output: &Output,
) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Title must not be empty.");
    }
    if status.is_some() && !owned {
        bail!("A reading status only applies to owned books. Add --owned.");
    }

    let id = store.add_book(NewBook {
        title: title.trim().to_string(),
        authors,
        categories: if categories.is_empty() {
            None
        } else {
            Some(categories)
        },
        page_count: pages,
        isbn,
        ownership: if owned {
            Ownership::Owned
        } else {
            Ownership::WantToHave
        },
        reading_status: status,
        ..NewBook::default()
    });

    output.success(&format!("Added book: {}", id));
    if let Some(book) = store.book(id) {
        output.print_book(book);
    }

    Ok(())
}

/// Search the lookup service without storing anything
pub async fn search(store: &BookStore, query: String, output: &Output) -> Result<()> {
    let candidates = lookup::search(&query, store.config().max_search_results).await;
    output.print_candidates(&candidates);
    Ok(())
}

/// List books, applying the given filters through the store
pub fn list(
    store: &mut BookStore,
    ownership: Option<Ownership>,
    status: Option<ReadingStatus>,
    favorite: bool,
    search: Option<String>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    store.clear_filters();
    store.set_filters(BookFilters {
        ownership,
        reading_status: status,
        search,
        category,
        favorite: favorite.then_some(true),
    });

    output.print_books(&store.filtered_books());
    Ok(())
}

/// Show a single book with its related books
pub fn show(store: &BookStore, id: String, output: &Output) -> Result<()> {
    let uuid = parse_book_id(&id, store)?;

    let book = store
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "book": book,
                "related": store.related_books(uuid),
            })
        );
        return Ok(());
    }

    output.print_book(book);

    let related = store.related_books(uuid);
    if !related.is_empty() && output.should_prompt() {
        println!();
        println!("── Related ──");
        for other in related {
            println!(
                "{} | {} - {}",
                &other.id.to_string()[..8],
                other.title,
                other.authors.join(", ")
            );
        }
    }

    Ok(())
}

/// Edit a book interactively
pub fn edit(store: &mut BookStore, id: String, output: &Output) -> Result<()> {
    let uuid = parse_book_id(&id, store)?;

    let book = store
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?
        .clone();

    println!("Editing book: {}", book.id);
    println!("Press Enter to keep current value, or type new value.\n");

    let mut patch = BookPatch::default();

    if let Some(new_title) = prompt_with_default("Title", &book.title)? {
        if new_title.trim().is_empty() {
            bail!("Title must not be empty.");
        }
        patch.title = Some(new_title);
    }

    let current_authors = book.authors.join(", ");
    if let Some(new_authors) = prompt_with_default("Authors (comma-separated)", &current_authors)? {
        let authors: Vec<String> = new_authors
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        patch.authors = Some(authors);
    }

    let current_categories = book
        .categories
        .as_ref()
        .map(|c| c.join(", "))
        .unwrap_or_default();
    if let Some(new_categories) =
        prompt_with_default("Categories (comma-separated)", &current_categories)?
    {
        let categories: Vec<String> = new_categories
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        patch.categories = Some(categories);
    }

    let current_pages = book
        .page_count
        .map(|p| p.to_string())
        .unwrap_or_default();
    if let Some(new_pages) = prompt_with_default("Page count", &current_pages)? {
        patch.page_count = Some(
            new_pages
                .parse()
                .context("Page count must be a non-negative number")?,
        );
    }

    store.update_book(uuid, patch);

    output.success("Book updated");
    if let Some(book) = store.book(uuid) {
        output.print_book(book);
    }

    Ok(())
}

/// Delete a book
pub fn delete(store: &mut BookStore, id: String, output: &Output) -> Result<()> {
    let uuid = parse_book_id(&id, store)?;

    let book = store
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    // Confirm deletion
    if output.should_prompt() {
        println!("Delete book: {} - {}", &uuid.to_string()[..8], book.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete_book(uuid);

    output.success(&format!("Deleted book: {}", uuid));

    Ok(())
}

/// Toggle a book's favorite flag
pub fn favorite(store: &mut BookStore, id: String, output: &Output) -> Result<()> {
    let uuid = parse_book_id(&id, store)?;

    if store.book(uuid).is_none() {
        bail!("Book not found: {}", id);
    }

    store.toggle_favorite(uuid);

    let state = store
        .book(uuid)
        .map(|b| b.is_favorite)
        .unwrap_or_default();
    output.success(&format!(
        "{} is {} a favorite",
        uuid,
        if state { "now" } else { "no longer" }
    ));

    Ok(())
}

/// Set a book's ownership
pub fn own(
    store: &mut BookStore,
    id: String,
    ownership: Ownership,
    output: &Output,
) -> Result<()> {
    let uuid = parse_book_id(&id, store)?;

    if store.book(uuid).is_none() {
        bail!("Book not found: {}", id);
    }

    store.update_book_ownership(uuid, ownership);

    output.success(&format!("Set ownership of {} to {}", uuid, ownership));
    Ok(())
}

/// Set a book's reading status
pub fn status(
    store: &mut BookStore,
    id: String,
    status: ReadingStatus,
    output: &Output,
) -> Result<()> {
    let uuid = parse_book_id(&id, store)?;

    let book = store
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;
    if book.ownership != Ownership::Owned {
        bail!("Reading status applies to owned books. Run `boook book own {} owned` first.", id);
    }

    store.update_reading_status(uuid, status);

    output.success(&format!("Set reading status of {} to {}", uuid, status));
    Ok(())
}

/// Set a book's progress marker
pub fn progress(store: &mut BookStore, id: String, page: u32, output: &Output) -> Result<()> {
    let uuid = parse_book_id(&id, store)?;

    let book = store
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;
    if book.ownership != Ownership::Owned {
        bail!("Reading progress applies to owned books. Run `boook book own {} owned` first.", id);
    }
    if let Some(total) = book.page_count {
        if page > total {
            output.message(&format!(
                "Note: page {} is past the recorded page count ({}).",
                page, total
            ));
        }
    }

    store.update_reading_progress(uuid, page);

    let book = store
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;
    if book.reading_status == Some(ReadingStatus::Read) {
        output.success(&format!("Finished! Marked {} as read.", uuid));
    } else {
        output.success(&format!("Progress of {} set to page {}", uuid, page));
    }

    Ok(())
}

/// Rate a book 0-5
pub fn rate(store: &mut BookStore, id: String, rating: u8, output: &Output) -> Result<()> {
    if rating > 5 {
        bail!("Rating must be between 0 and 5.");
    }

    let uuid = parse_book_id(&id, store)?;

    if store.book(uuid).is_none() {
        bail!("Book not found: {}", id);
    }

    store.update_book(
        uuid,
        BookPatch {
            rating: Some(rating),
            ..BookPatch::default()
        },
    );

    output.success(&format!("Rated {} {}/5", uuid, rating));
    Ok(())
}

/// Edit a book's notes in $EDITOR
pub fn note(store: &mut BookStore, id: String, output: &Output) -> Result<()> {
    let uuid = parse_book_id(&id, store)?;

    let current = store
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?
        .notes
        .clone()
        .unwrap_or_default();

    let edited = edit_text(&current)?;

    store.update_book(
        uuid,
        BookPatch {
            notes: Some(edited.trim_end().to_string()),
            ..BookPatch::default()
        },
    );

    output.success("Notes updated");
    Ok(())
}

/// Parse a book ID (supports full UUID or prefix)
pub fn parse_book_id(id: &str, store: &BookStore) -> Result<Uuid> {
    // Try full UUID first
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    // Try prefix match
    let matches: Vec<_> = store
        .books()
        .iter()
        .filter(|b| b.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No book found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple books match '{}':", id);
            for book in &matches {
                eprintln!("  {} - {}", book.id, book.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Prompt with a default value, returns None if user keeps default
fn prompt_with_default(prompt: &str, default: &str) -> Result<Option<String>> {
    use std::io::{self, Write};

    if default.is_empty() {
        print!("{}: ", prompt);
    } else {
        print!("{} [{}]: ", prompt, default);
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}
