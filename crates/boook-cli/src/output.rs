//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use boook_core::{Book, LibraryStats, ReadingGoal, ReadingList};

use crate::lookup::Volume;
use crate::movies::{Genre, MoviePage};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single book in full
    pub fn print_book(&self, book: &Book) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:         {}", book.id);
                println!("Title:      {}", book.title);
                if !book.authors.is_empty() {
                    println!("Authors:    {}", book.authors.join(", "));
                }
                println!("Ownership:  {}", book.ownership);
                if let Some(status) = book.reading_status {
                    println!("Status:     {}", status);
                }
                match (book.current_page, book.page_count) {
                    (Some(page), Some(total)) => println!("Pages:      {}/{}", page, total),
                    (Some(page), None) => println!("Pages:      {}", page),
                    (None, Some(total)) => println!("Pages:      {} total", total),
                    (None, None) => {}
                }
                if let Some(rating) = book.rating {
                    println!("Rating:     {}/5", rating);
                }
                if book.is_favorite {
                    println!("Favorite:   yes");
                }
                if let Some(ref categories) = book.categories {
                    if !categories.is_empty() {
                        println!("Categories: {}", categories.join(", "));
                    }
                }
                if let Some(ref isbn) = book.isbn {
                    println!("ISBN:       {}", isbn);
                }
                if let Some(ref published) = book.published_date {
                    println!("Published:  {}", published);
                }
                println!("Added:      {}", book.date_added.format("%Y-%m-%d %H:%M"));
                if let Some(started) = book.date_started {
                    println!("Started:    {}", started.format("%Y-%m-%d %H:%M"));
                }
                if let Some(finished) = book.date_finished {
                    println!("Finished:   {}", finished.format("%Y-%m-%d %H:%M"));
                }
                if let Some(ref description) = book.description {
                    println!();
                    println!("{}", truncate(description, 300));
                }
                if let Some(ref notes) = book.notes {
                    println!();
                    println!("── Notes ──");
                    println!("{}", notes);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(book).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", book.id);
            }
        }
    }

    /// Print a list of books
    pub fn print_books(&self, books: &[&Book]) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books found.");
                    return;
                }
                for book in books {
                    let state = match book.reading_status {
                        Some(status) => format!("{}", status),
                        None => format!("{}", book.ownership),
                    };
                    let favorite = if book.is_favorite { " ★" } else { "" };
                    println!(
                        "{} | {} | {} | {}{}",
                        &book.id.to_string()[..8],
                        truncate(&book.title, 35),
                        truncate(&book.authors.join(", "), 25),
                        state,
                        favorite
                    );
                }
                println!("\n{} book(s)", books.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(books).unwrap());
            }
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    /// Print numbered lookup candidates
    pub fn print_candidates(&self, volumes: &[Volume]) {
        match self.format {
            OutputFormat::Human => {
                if volumes.is_empty() {
                    println!("No books found. Check the query or try again later.");
                    return;
                }
                for (index, volume) in volumes.iter().enumerate() {
                    let info = &volume.volume_info;
                    let title = info.title.as_deref().unwrap_or("(untitled)");
                    let authors = info
                        .authors
                        .as_ref()
                        .map(|a| a.join(", "))
                        .unwrap_or_else(|| "(unknown author)".to_string());
                    let year = info
                        .published_date
                        .as_deref()
                        .map(|d| format!(" ({})", &d[..d.len().min(4)]))
                        .unwrap_or_default();
                    println!(
                        "{:>2}. {} - {}{}",
                        index + 1,
                        truncate(title, 45),
                        truncate(&authors, 30),
                        year
                    );
                }
                println!("\n{} candidate(s)", volumes.len());
            }
            OutputFormat::Json => {
                let entries: Vec<_> = volumes
                    .iter()
                    .map(|v| {
                        serde_json::json!({
                            "id": v.id,
                            "title": v.volume_info.title,
                            "authors": v.volume_info.authors,
                            "publishedDate": v.volume_info.published_date,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries).unwrap());
            }
            OutputFormat::Quiet => {
                for volume in volumes {
                    println!("{}", volume.id);
                }
            }
        }
    }

    /// Print library statistics
    pub fn print_stats(&self, stats: &LibraryStats) {
        match self.format {
            OutputFormat::Human => {
                println!("Library");
                println!("=======");
                println!("Total:         {}", stats.total);
                println!("Owned:         {}", stats.owned);
                println!("Want to have:  {}", stats.want_to_have);
                println!();
                println!("Read:          {}", stats.read);
                println!("Reading now:   {}", stats.reading);
                println!("Want to read:  {}", stats.want_to_read);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(stats).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", stats.total);
            }
        }
    }

    /// Print reading goals with the finished-count derived for each year
    pub fn print_goals(&self, goals: &[(&ReadingGoal, usize)]) {
        match self.format {
            OutputFormat::Human => {
                if goals.is_empty() {
                    println!("No reading goals set.");
                    return;
                }
                for (goal, finished) in goals {
                    println!(
                        "{} | {}: {}/{} finished (snapshot at creation: {})",
                        &goal.id.to_string()[..8],
                        goal.year,
                        finished,
                        goal.target_books,
                        goal.current_books
                    );
                }
            }
            OutputFormat::Json => {
                let entries: Vec<_> = goals
                    .iter()
                    .map(|(goal, finished)| {
                        serde_json::json!({
                            "id": goal.id,
                            "year": goal.year,
                            "targetBooks": goal.target_books,
                            "currentBooks": goal.current_books,
                            "createdAt": goal.created_at,
                            "finished": finished,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries).unwrap());
            }
            OutputFormat::Quiet => {
                for (goal, _) in goals {
                    println!("{}", goal.id);
                }
            }
        }
    }

    /// Print reading list summaries
    pub fn print_reading_lists(&self, lists: &[ReadingList]) {
        match self.format {
            OutputFormat::Human => {
                if lists.is_empty() {
                    println!("No reading lists.");
                    return;
                }
                for list in lists {
                    println!(
                        "{} | {} | {} book(s) | updated {}",
                        &list.id.to_string()[..8],
                        truncate(&list.name, 30),
                        list.books.len(),
                        list.updated_at.format("%Y-%m-%d")
                    );
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(lists).unwrap());
            }
            OutputFormat::Quiet => {
                for list in lists {
                    println!("{}", list.id);
                }
            }
        }
    }

    /// Print one reading list with its resolved books, in list order
    pub fn print_reading_list(&self, list: &ReadingList, books: &[&Book]) {
        match self.format {
            OutputFormat::Human => {
                println!("{} ({} book(s))", list.name, books.len());
                println!();
                for (index, book) in books.iter().enumerate() {
                    println!(
                        "{:>2}. {} - {}",
                        index + 1,
                        truncate(&book.title, 40),
                        truncate(&book.authors.join(", "), 30)
                    );
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "id": list.id,
                        "name": list.name,
                        "createdAt": list.created_at,
                        "updatedAt": list.updated_at,
                        "books": books,
                    })
                );
            }
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    /// Print a page of movies, skipping entries too bare to render
    pub fn print_movies(&self, page: &MoviePage) {
        let renderable: Vec<_> = page.results.iter().filter(|m| m.is_renderable()).collect();

        match self.format {
            OutputFormat::Human => {
                if renderable.is_empty() {
                    println!("No results.");
                    return;
                }
                for movie in &renderable {
                    let title = movie.title.as_deref().unwrap_or_default();
                    let year = movie
                        .release_date
                        .as_deref()
                        .map(|d| format!(" ({})", &d[..d.len().min(4)]))
                        .unwrap_or_default();
                    println!(
                        "{} | {:.1}/5{}",
                        truncate(title, 45),
                        movie.rating_out_of_five(),
                        year
                    );
                }
                println!("\nPage {}/{}", page.page, page.total_pages);
            }
            OutputFormat::Json => {
                let entries: Vec<_> = renderable
                    .iter()
                    .map(|m| {
                        serde_json::json!({
                            "id": m.id,
                            "title": m.title,
                            "overview": m.overview,
                            "releaseDate": m.release_date,
                            "rating": m.rating_out_of_five(),
                            "genreIds": m.genre_ids,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "page": page.page,
                        "totalPages": page.total_pages,
                        "results": entries,
                    })
                );
            }
            OutputFormat::Quiet => {
                for movie in &renderable {
                    println!("{}", movie.id);
                }
            }
        }
    }

    /// Print the genre list
    pub fn print_genres(&self, genres: &[Genre]) {
        match self.format {
            OutputFormat::Human => {
                for genre in genres {
                    println!("{} ({})", genre.name, genre.id);
                }
            }
            OutputFormat::Json => {
                let entries: Vec<_> = genres
                    .iter()
                    .map(|g| serde_json::json!({"id": g.id, "name": g.name}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries).unwrap());
            }
            OutputFormat::Quiet => {
                for genre in genres {
                    println!("{}", genre.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
