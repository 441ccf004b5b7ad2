//! Data models for boook
//!
//! Defines the core data structures: Book, ReadingGoal, and ReadingList,
//! plus the input payloads and derived-view types the store works with.
//! All entities serialize with camelCase field names so the durable JSON
//! slots keep the documented layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether the user possesses a book or merely wants it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    WantToHave,
    Owned,
}

impl Default for Ownership {
    fn default() -> Self {
        Ownership::WantToHave
    }
}

impl std::fmt::Display for Ownership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ownership::WantToHave => write!(f, "want_to_have"),
            Ownership::Owned => write!(f, "owned"),
        }
    }
}

impl std::str::FromStr for Ownership {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owned" => Ok(Ownership::Owned),
            "want_to_have" | "want-to-have" => Ok(Ownership::WantToHave),
            _ => Err(format!(
                "unknown ownership '{}' (expected 'owned' or 'want_to_have')",
                s
            )),
        }
    }
}

/// A book's progress stage, meaningful only while the book is owned
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    WantToRead,
    CurrentlyReading,
    Read,
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadingStatus::WantToRead => write!(f, "want_to_read"),
            ReadingStatus::CurrentlyReading => write!(f, "currently_reading"),
            ReadingStatus::Read => write!(f, "read"),
        }
    }
}

impl std::str::FromStr for ReadingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "want_to_read" | "want-to-read" => Ok(ReadingStatus::WantToRead),
            "currently_reading" | "currently-reading" | "reading" => {
                Ok(ReadingStatus::CurrentlyReading)
            }
            "read" => Ok(ReadingStatus::Read),
            _ => Err(format!(
                "unknown reading status '{}' (expected 'want_to_read', 'currently_reading' or 'read')",
                s
            )),
        }
    }
}

/// A cataloged book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned at creation
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Authors in display order
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cover image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// ISBN-13 when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Whether the user has the book; governs the reading-status fields
    pub ownership: Ownership,
    /// Progress stage; present only while the user has set it on an owned book
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_status: Option<ReadingStatus>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Progress marker while currently reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    /// 0-5 once the book has been read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Set once at creation, immutable thereafter
    pub date_added: DateTime<Utc>,
    /// Stamped the first time the book enters `currently_reading`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_started: Option<DateTime<Utc>>,
    /// Stamped on every transition into `read`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_finished: Option<DateTime<Utc>>,
    /// Reserved for cross-list ordering; round-trips untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<i64>,
}

impl Book {
    /// Create a book from an input payload, assigning identity and `date_added`
    ///
    /// UUIDv7 identifiers carry a millisecond time prefix, so ids sort in
    /// creation order when compared as strings.
    pub fn new(data: NewBook) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: data.title,
            authors: data.authors,
            description: data.description,
            thumbnail: data.thumbnail,
            published_date: data.published_date,
            page_count: data.page_count,
            categories: data.categories,
            isbn: data.isbn,
            ownership: data.ownership,
            reading_status: data.reading_status,
            is_favorite: data.is_favorite,
            current_page: data.current_page,
            rating: data.rating,
            notes: data.notes,
            date_added: Utc::now(),
            date_started: None,
            date_finished: None,
            reading_order: data.reading_order,
        }
    }

    /// Whether this book shares at least one author with `other`
    pub fn shares_author(&self, other: &Book) -> bool {
        self.authors.iter().any(|a| other.authors.contains(a))
    }

    /// Whether this book shares at least one category with `other`
    pub fn shares_category(&self, other: &Book) -> bool {
        match (&self.categories, &other.categories) {
            (Some(mine), Some(theirs)) => mine.iter().any(|c| theirs.contains(c)),
            _ => false,
        }
    }
}

/// Input payload for creating a book; the store assigns `id` and `date_added`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default)]
    pub ownership: Ownership,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_status: Option<ReadingStatus>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<i64>,
}

/// Field-wise update for a book; fields left as `None` are untouched
///
/// Clearing of the reading-status group happens only through the ownership
/// transition, never through a patch.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    pub categories: Option<Vec<String>>,
    pub isbn: Option<String>,
    pub is_favorite: Option<bool>,
    pub current_page: Option<u32>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub reading_order: Option<i64>,
}

impl BookPatch {
    /// Shallow-overwrite the set fields onto `book`
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(authors) = self.authors {
            book.authors = authors;
        }
        if let Some(description) = self.description {
            book.description = Some(description);
        }
        if let Some(thumbnail) = self.thumbnail {
            book.thumbnail = Some(thumbnail);
        }
        if let Some(published_date) = self.published_date {
            book.published_date = Some(published_date);
        }
        if let Some(page_count) = self.page_count {
            book.page_count = Some(page_count);
        }
        if let Some(categories) = self.categories {
            book.categories = Some(categories);
        }
        if let Some(isbn) = self.isbn {
            book.isbn = Some(isbn);
        }
        if let Some(is_favorite) = self.is_favorite {
            book.is_favorite = is_favorite;
        }
        if let Some(current_page) = self.current_page {
            book.current_page = Some(current_page);
        }
        if let Some(rating) = self.rating {
            book.rating = Some(rating);
        }
        if let Some(notes) = self.notes {
            book.notes = Some(notes);
        }
        if let Some(reading_order) = self.reading_order {
            book.reading_order = Some(reading_order);
        }
    }
}

/// A yearly reading target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingGoal {
    pub id: Uuid,
    pub year: i32,
    pub target_books: u32,
    /// Progress snapshot taken at creation time; not auto-updated
    pub current_books: u32,
    pub created_at: DateTime<Utc>,
}

impl ReadingGoal {
    /// Create a goal from an input payload, assigning identity and `created_at`
    pub fn new(data: NewReadingGoal) -> Self {
        Self {
            id: Uuid::now_v7(),
            year: data.year,
            target_books: data.target_books,
            current_books: data.current_books,
            created_at: Utc::now(),
        }
    }
}

/// Input payload for creating a reading goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReadingGoal {
    pub year: i32,
    pub target_books: u32,
    #[serde(default)]
    pub current_books: u32,
}

/// Field-wise update for a reading goal; fields left as `None` are untouched
#[derive(Debug, Clone, Default)]
pub struct ReadingGoalPatch {
    pub year: Option<i32>,
    pub target_books: Option<u32>,
    pub current_books: Option<u32>,
}

impl ReadingGoalPatch {
    pub fn apply(self, goal: &mut ReadingGoal) {
        if let Some(year) = self.year {
            goal.year = year;
        }
        if let Some(target_books) = self.target_books {
            goal.target_books = target_books;
        }
        if let Some(current_books) = self.current_books {
            goal.current_books = current_books;
        }
    }
}

/// A named, user-ordered sequence of book references
///
/// Entries reference books by id; a referenced book may have been deleted
/// since (no cascade), so consumers filter dangling ids at render time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingList {
    pub id: Uuid,
    pub name: String,
    pub books: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReadingList {
    /// Create an empty list with the given name
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            books: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rename the list
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Append a book reference unless it is already a member
    pub fn add_book(&mut self, book_id: Uuid) {
        if !self.books.contains(&book_id) {
            self.books.push(book_id);
            self.updated_at = Utc::now();
        }
    }

    /// Remove every occurrence of a book reference
    pub fn remove_book(&mut self, book_id: Uuid) {
        let before = self.books.len();
        self.books.retain(|id| *id != book_id);
        if self.books.len() != before {
            self.updated_at = Utc::now();
        }
    }

    /// Replace the sequence wholesale with a caller-supplied ordering
    pub fn reorder(&mut self, book_ids: Vec<Uuid>) {
        self.books = book_ids;
        self.updated_at = Utc::now();
    }
}

/// Conjunctive filter over the book collection; unset fields impose no constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilters {
    pub ownership: Option<Ownership>,
    pub reading_status: Option<ReadingStatus>,
    /// Case-insensitive substring match against title or any author
    pub search: Option<String>,
    /// Case-insensitive substring match against any category
    pub category: Option<String>,
    /// `true` restricts to favorites
    pub favorite: Option<bool>,
}

impl BookFilters {
    /// Merge the set fields of `other` into this filter
    pub fn merge(&mut self, other: BookFilters) {
        if other.ownership.is_some() {
            self.ownership = other.ownership;
        }
        if other.reading_status.is_some() {
            self.reading_status = other.reading_status;
        }
        if other.search.is_some() {
            self.search = other.search;
        }
        if other.category.is_some() {
            self.category = other.category;
        }
        if other.favorite.is_some() {
            self.favorite = other.favorite;
        }
    }

    /// Whether a book satisfies every set filter field
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(ownership) = self.ownership {
            if book.ownership != ownership {
                return false;
            }
        }
        if let Some(status) = self.reading_status {
            if book.reading_status != Some(status) {
                return false;
            }
        }
        if self.favorite.unwrap_or(false) && !book.is_favorite {
            return false;
        }
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            let matches_title = book.title.to_lowercase().contains(&needle);
            let matches_author = book
                .authors
                .iter()
                .any(|a| a.to_lowercase().contains(&needle));
            if !matches_title && !matches_author {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            let needle = category.to_lowercase();
            let matches_category = book
                .categories
                .as_ref()
                .is_some_and(|cats| cats.iter().any(|c| c.to_lowercase().contains(&needle)));
            if !matches_category {
                return false;
            }
        }
        true
    }
}

/// Counts derived from the current book collection
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total: usize,
    pub owned: usize,
    pub want_to_have: usize,
    pub read: usize,
    pub reading: usize,
    pub want_to_read: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book(title: &str) -> Book {
        Book::new(NewBook {
            title: title.to_string(),
            authors: vec!["Author".to_string()],
            ..NewBook::default()
        })
    }

    #[test]
    fn test_book_new() {
        let book = sample_book("Dune");
        assert_eq!(book.title, "Dune");
        assert_eq!(book.ownership, Ownership::WantToHave);
        assert!(book.reading_status.is_none());
        assert!(!book.is_favorite);
        assert!(book.date_started.is_none());
        assert!(book.date_finished.is_none());
    }

    #[test]
    fn test_book_ids_sort_in_creation_order() {
        let first = sample_book("First");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = sample_book("Second");
        assert!(first.id.to_string() < second.id.to_string());
    }

    #[test]
    fn test_book_serialization_is_camel_case() {
        let mut book = sample_book("Dune");
        book.page_count = Some(412);
        book.reading_status = Some(ReadingStatus::Read);

        let json = serde_json::to_string(&book).unwrap();
        assert!(json.contains("\"dateAdded\""));
        assert!(json.contains("\"pageCount\":412"));
        assert!(json.contains("\"readingStatus\":\"read\""));
        assert!(json.contains("\"isFavorite\":false"));
        // Absent optionals are omitted entirely
        assert!(!json.contains("dateFinished"));
        assert!(!json.contains("isbn"));

        let deserialized: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(book, deserialized);
    }

    #[test]
    fn test_ownership_round_trip() {
        assert_eq!(
            serde_json::to_string(&Ownership::WantToHave).unwrap(),
            "\"want_to_have\""
        );
        assert_eq!("owned".parse::<Ownership>().unwrap(), Ownership::Owned);
        assert!("borrowed".parse::<Ownership>().is_err());
    }

    #[test]
    fn test_reading_status_round_trip() {
        assert_eq!(
            serde_json::to_string(&ReadingStatus::CurrentlyReading).unwrap(),
            "\"currently_reading\""
        );
        assert_eq!(
            "currently_reading".parse::<ReadingStatus>().unwrap(),
            ReadingStatus::CurrentlyReading
        );
        assert!("skimmed".parse::<ReadingStatus>().is_err());
    }

    #[test]
    fn test_patch_apply_leaves_unset_fields() {
        let mut book = sample_book("Dune");
        book.rating = Some(4);

        let patch = BookPatch {
            notes: Some("A classic".to_string()),
            ..BookPatch::default()
        };
        patch.apply(&mut book);

        assert_eq!(book.notes.as_deref(), Some("A classic"));
        assert_eq!(book.rating, Some(4));
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn test_shares_author_and_category() {
        let mut a = sample_book("A");
        a.authors = vec!["Frank Herbert".to_string()];
        a.categories = Some(vec!["Fiction".to_string()]);

        let mut b = sample_book("B");
        b.authors = vec!["Frank Herbert".to_string(), "Kevin J. Anderson".to_string()];
        b.categories = None;

        assert!(a.shares_author(&b));
        assert!(!a.shares_category(&b));

        b.categories = Some(vec!["Fiction".to_string(), "Epic".to_string()]);
        assert!(a.shares_category(&b));
    }

    #[test]
    fn test_reading_list_membership() {
        let mut list = ReadingList::new("To read");
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();

        list.add_book(a);
        list.add_book(b);
        assert_eq!(list.books, vec![a, b]);

        // Adding a member again is a no-op
        list.add_book(a);
        assert_eq!(list.books.len(), 2);

        list.remove_book(a);
        assert_eq!(list.books, vec![b]);
    }

    #[test]
    fn test_reading_list_remove_clears_every_occurrence() {
        let mut list = ReadingList::new("Dupes");
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        // Duplicates can exist in lists restored from imported data
        list.books = vec![a, b, a];

        list.remove_book(a);
        assert_eq!(list.books, vec![b]);
    }

    #[test]
    fn test_reading_list_mutations_refresh_updated_at() {
        let mut list = ReadingList::new("To read");
        let original = list.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));

        list.add_book(Uuid::now_v7());
        assert!(list.updated_at > original);

        let after_add = list.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));
        list.reorder(Vec::new());
        assert!(list.updated_at > after_add);
    }

    #[test]
    fn test_filters_default_match_everything() {
        let filters = BookFilters::default();
        assert!(filters.matches(&sample_book("Anything")));
    }

    #[test]
    fn test_filters_search_matches_title_or_author() {
        let mut dune = sample_book("Dune");
        dune.authors = vec!["Frank Herbert".to_string()];
        let mut foundation = sample_book("Foundation");
        foundation.authors = vec!["Asimov".to_string()];

        let filters = BookFilters {
            search: Some("dune".to_string()),
            ..BookFilters::default()
        };
        assert!(filters.matches(&dune));
        assert!(!filters.matches(&foundation));

        let by_author = BookFilters {
            search: Some("asimov".to_string()),
            ..BookFilters::default()
        };
        assert!(by_author.matches(&foundation));
    }

    #[test]
    fn test_filters_category_is_case_insensitive_substring() {
        let mut book = sample_book("Dune");
        book.categories = Some(vec!["Science Fiction".to_string()]);

        let filters = BookFilters {
            category: Some("science".to_string()),
            ..BookFilters::default()
        };
        assert!(filters.matches(&book));

        let mut uncategorized = sample_book("Blank");
        uncategorized.categories = None;
        assert!(!filters.matches(&uncategorized));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let mut book = sample_book("Dune");
        book.ownership = Ownership::Owned;
        book.reading_status = Some(ReadingStatus::Read);
        book.is_favorite = true;

        let filters = BookFilters {
            ownership: Some(Ownership::Owned),
            reading_status: Some(ReadingStatus::Read),
            favorite: Some(true),
            ..BookFilters::default()
        };
        assert!(filters.matches(&book));

        book.is_favorite = false;
        assert!(!filters.matches(&book));
    }

    #[test]
    fn test_filters_merge_keeps_unset_fields() {
        let mut filters = BookFilters {
            ownership: Some(Ownership::Owned),
            ..BookFilters::default()
        };
        filters.merge(BookFilters {
            search: Some("dune".to_string()),
            ..BookFilters::default()
        });

        assert_eq!(filters.ownership, Some(Ownership::Owned));
        assert_eq!(filters.search.as_deref(), Some("dune"));
    }
}
