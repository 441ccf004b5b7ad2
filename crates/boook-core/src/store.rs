//! The book collection store
//!
//! The `BookStore` owns the authoritative in-memory collections (books,
//! reading goals, reading lists) plus the active filter value, and mirrors
//! every mutation to durable storage (write-through, one slot per
//! collection, no batching).
//!
//! The store is built once at the application's composition root and passed
//! by reference to whatever presents it; it is the single writer of its
//! collections. Mutations referencing an unknown id are silent no-ops.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = BookStore::open(config);
//!
//! let id = store.add_book(NewBook {
//!     title: "Dune".to_string(),
//!     ..NewBook::default()
//! });
//!
//! store.update_reading_status(id, ReadingStatus::CurrentlyReading);
//! let stats = store.stats();
//! ```

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{
    Book, BookFilters, BookPatch, LibraryStats, NewBook, NewReadingGoal, Ownership, ReadingGoal,
    ReadingGoalPatch, ReadingList, ReadingStatus,
};
use crate::storage::{SlotStorage, BOOKS_KEY, GOALS_KEY, LISTS_KEY};

/// Cap on the number of related books returned
const RELATED_BOOKS_LIMIT: usize = 6;

/// Authoritative store for the book collection and its side collections
pub struct BookStore {
    books: Vec<Book>,
    reading_goals: Vec<ReadingGoal>,
    reading_lists: Vec<ReadingList>,
    filters: BookFilters,
    initialized: bool,
    storage: SlotStorage,
}

impl BookStore {
    /// Open the store: build the slot adapter and run the one-time load
    pub fn open(config: Config) -> Self {
        let mut store = Self::with_storage(SlotStorage::new(config));
        store.load();
        store
    }

    /// Create a store over an existing adapter without loading anything yet
    pub fn with_storage(storage: SlotStorage) -> Self {
        Self {
            books: Vec::new(),
            reading_goals: Vec::new(),
            reading_lists: Vec::new(),
            filters: BookFilters::default(),
            initialized: false,
            storage,
        }
    }

    /// Read all collections from storage into memory
    ///
    /// Idempotent: once initialized, further calls are no-ops, so any number
    /// of mount points may call this without duplicating work.
    pub fn load(&mut self) {
        if self.initialized {
            return;
        }

        self.books = self.storage.get(BOOKS_KEY, Vec::new());
        self.reading_goals = self.storage.get(GOALS_KEY, Vec::new());
        self.reading_lists = self.storage.get(LISTS_KEY, Vec::new());
        self.initialized = true;

        debug!(
            books = self.books.len(),
            goals = self.reading_goals.len(),
            lists = self.reading_lists.len(),
            "loaded collections"
        );
    }

    /// Whether the one-time load has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get the configuration backing the storage adapter
    pub fn config(&self) -> &Config {
        self.storage.config()
    }

    // ==================== Book operations ====================

    /// Add a book, assigning its id and `date_added`
    ///
    /// No duplicate check: cataloging the same title twice is permitted.
    pub fn add_book(&mut self, data: NewBook) -> Uuid {
        let book = Book::new(data);
        let id = book.id;
        self.books.push(book);
        self.save_books();
        id
    }

    /// Merge a patch into the matching book (shallow field overwrite)
    pub fn update_book(&mut self, id: Uuid, patch: BookPatch) {
        if let Some(book) = self.book_mut(id) {
            patch.apply(book);
            self.save_books();
        }
    }

    /// Remove a book
    ///
    /// Reading lists are not touched: they may keep dangling references,
    /// which consumers filter out at render time.
    pub fn delete_book(&mut self, id: Uuid) {
        let before = self.books.len();
        self.books.retain(|b| b.id != id);
        if self.books.len() != before {
            self.save_books();
        }
    }

    /// Flip a book's favorite flag
    pub fn toggle_favorite(&mut self, id: Uuid) {
        if let Some(book) = self.book_mut(id) {
            book.is_favorite = !book.is_favorite;
            self.save_books();
        }
    }

    /// Set a book's ownership
    ///
    /// Reverting to `want_to_have` clears the whole reading-status group in
    /// the same update; see [`apply_ownership_transition`].
    pub fn update_book_ownership(&mut self, id: Uuid, ownership: Ownership) {
        if let Some(book) = self.book_mut(id) {
            apply_ownership_transition(book, ownership);
            self.save_books();
        }
    }

    /// Set a book's reading status, stamping lifecycle timestamps
    ///
    /// `date_started` is stamped only on the first entry into
    /// `currently_reading`; `date_finished` is stamped on every entry into
    /// `read`, including re-entry.
    pub fn update_reading_status(&mut self, id: Uuid, status: ReadingStatus) {
        if let Some(book) = self.book_mut(id) {
            book.reading_status = Some(status);
            match status {
                ReadingStatus::CurrentlyReading => {
                    if book.date_started.is_none() {
                        book.date_started = Some(Utc::now());
                    }
                }
                ReadingStatus::Read => {
                    book.date_finished = Some(Utc::now());
                }
                ReadingStatus::WantToRead => {}
            }
            self.save_books();
        }
    }

    /// Set a book's progress marker
    ///
    /// Reaching the known page count marks the book read and stamps
    /// `date_finished`. The page value itself is not clamped; callers are
    /// responsible for sane input.
    pub fn update_reading_progress(&mut self, id: Uuid, page: u32) {
        if let Some(book) = self.book_mut(id) {
            book.current_page = Some(page);
            if let Some(page_count) = book.page_count {
                if page >= page_count {
                    book.reading_status = Some(ReadingStatus::Read);
                    book.date_finished = Some(Utc::now());
                }
            }
            self.save_books();
        }
    }

    /// Replace the whole book collection (backup restore)
    pub fn import_books(&mut self, books: Vec<Book>) {
        self.books = books;
        self.save_books();
    }

    // ==================== Queries ====================

    /// Look up one book by id
    pub fn book(&self, id: Uuid) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// The full collection, in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Books matching every set field of the active filter, insertion order
    pub fn filtered_books(&self) -> Vec<&Book> {
        self.books.iter().filter(|b| self.filters.matches(b)).collect()
    }

    /// Books with the given ownership, insertion order
    pub fn books_by_ownership(&self, ownership: Ownership) -> Vec<&Book> {
        self.books.iter().filter(|b| b.ownership == ownership).collect()
    }

    /// Books with the given reading status, insertion order
    pub fn books_by_reading_status(&self, status: ReadingStatus) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|b| b.reading_status == Some(status))
            .collect()
    }

    /// Up to 6 other books sharing an author or a category with the target
    ///
    /// The author check runs first; either condition alone qualifies.
    /// Returns an empty list when the target id is unknown.
    pub fn related_books(&self, book_id: Uuid) -> Vec<&Book> {
        let Some(target) = self.book(book_id) else {
            return Vec::new();
        };

        self.books
            .iter()
            .filter(|b| b.id != book_id && (b.shares_author(target) || b.shares_category(target)))
            .take(RELATED_BOOKS_LIMIT)
            .collect()
    }

    /// Counts over the current collection, recomputed on every call
    pub fn stats(&self) -> LibraryStats {
        LibraryStats {
            total: self.books.len(),
            owned: self.count_ownership(Ownership::Owned),
            want_to_have: self.count_ownership(Ownership::WantToHave),
            read: self.count_status(ReadingStatus::Read),
            reading: self.count_status(ReadingStatus::CurrentlyReading),
            want_to_read: self.count_status(ReadingStatus::WantToRead),
        }
    }

    fn count_ownership(&self, ownership: Ownership) -> usize {
        self.books.iter().filter(|b| b.ownership == ownership).count()
    }

    fn count_status(&self, status: ReadingStatus) -> usize {
        self.books
            .iter()
            .filter(|b| b.reading_status == Some(status))
            .count()
    }

    // ==================== Filters ====================

    /// The active filter value
    pub fn filters(&self) -> &BookFilters {
        &self.filters
    }

    /// Merge the set fields of `partial` into the active filter
    ///
    /// In-memory only; filters are never persisted.
    pub fn set_filters(&mut self, partial: BookFilters) {
        self.filters.merge(partial);
    }

    /// Reset the active filter
    pub fn clear_filters(&mut self) {
        self.filters = BookFilters::default();
    }

    // ==================== Reading goals ====================

    /// All reading goals, in insertion order
    pub fn reading_goals(&self) -> &[ReadingGoal] {
        &self.reading_goals
    }

    /// Add a reading goal, assigning its id and `created_at`
    ///
    /// Year uniqueness is the caller's responsibility; the store accepts
    /// whatever it is handed.
    pub fn add_reading_goal(&mut self, data: NewReadingGoal) -> Uuid {
        let goal = ReadingGoal::new(data);
        let id = goal.id;
        self.reading_goals.push(goal);
        self.save_goals();
        id
    }

    /// Merge a patch into the matching goal
    pub fn update_reading_goal(&mut self, id: Uuid, patch: ReadingGoalPatch) {
        if let Some(goal) = self.reading_goals.iter_mut().find(|g| g.id == id) {
            patch.apply(goal);
            self.save_goals();
        }
    }

    /// Remove a reading goal
    pub fn delete_reading_goal(&mut self, id: Uuid) {
        let before = self.reading_goals.len();
        self.reading_goals.retain(|g| g.id != id);
        if self.reading_goals.len() != before {
            self.save_goals();
        }
    }

    // ==================== Reading lists ====================

    /// All reading lists, in insertion order
    pub fn reading_lists(&self) -> &[ReadingList] {
        &self.reading_lists
    }

    /// Look up one reading list by id
    pub fn reading_list(&self, id: Uuid) -> Option<&ReadingList> {
        self.reading_lists.iter().find(|l| l.id == id)
    }

    /// Create an empty reading list
    pub fn create_reading_list(&mut self, name: impl Into<String>) -> Uuid {
        let list = ReadingList::new(name);
        let id = list.id;
        self.reading_lists.push(list);
        self.save_lists();
        id
    }

    /// Rename a reading list
    pub fn rename_reading_list(&mut self, id: Uuid, name: impl Into<String>) {
        if let Some(list) = self.reading_list_mut(id) {
            list.rename(name);
            self.save_lists();
        }
    }

    /// Remove a reading list
    pub fn delete_reading_list(&mut self, id: Uuid) {
        let before = self.reading_lists.len();
        self.reading_lists.retain(|l| l.id != id);
        if self.reading_lists.len() != before {
            self.save_lists();
        }
    }

    /// Append a book reference to a list unless already a member
    ///
    /// The store does not check that the book exists; lists tolerate
    /// dangling references.
    pub fn add_book_to_list(&mut self, list_id: Uuid, book_id: Uuid) {
        if let Some(list) = self.reading_list_mut(list_id) {
            list.add_book(book_id);
            self.save_lists();
        }
    }

    /// Remove every occurrence of a book reference from a list
    pub fn remove_book_from_list(&mut self, list_id: Uuid, book_id: Uuid) {
        if let Some(list) = self.reading_list_mut(list_id) {
            list.remove_book(book_id);
            self.save_lists();
        }
    }

    /// Replace a list's ordering wholesale
    ///
    /// The caller supplies the full new sequence; set-equality with the
    /// prior contents is not validated.
    pub fn reorder_list(&mut self, list_id: Uuid, book_ids: Vec<Uuid>) {
        if let Some(list) = self.reading_list_mut(list_id) {
            list.reorder(book_ids);
            self.save_lists();
        }
    }

    // ==================== Persistence ====================

    fn book_mut(&mut self, id: Uuid) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id == id)
    }

    fn reading_list_mut(&mut self, id: Uuid) -> Option<&mut ReadingList> {
        self.reading_lists.iter_mut().find(|l| l.id == id)
    }

    fn save_books(&self) {
        self.storage.set(BOOKS_KEY, &self.books);
    }

    fn save_goals(&self) {
        self.storage.set(GOALS_KEY, &self.reading_goals);
    }

    fn save_lists(&self) {
        self.storage.set(LISTS_KEY, &self.reading_lists);
    }
}

/// Apply an ownership transition to a book
///
/// Reverting to `want_to_have` clears `reading_status`, `current_page`,
/// `date_started` and `date_finished` in the same update; moving to `owned`
/// changes nothing else. This is the only path that clears the
/// reading-status group.
pub fn apply_ownership_transition(book: &mut Book, ownership: Ownership) {
    book.ownership = ownership;
    if ownership == Ownership::WantToHave {
        book.reading_status = None;
        book.current_page = None;
        book.date_started = None;
        book.date_finished = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            authors: vec!["Author".to_string()],
            ..NewBook::default()
        }
    }

    #[test]
    fn test_open_creates_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = BookStore::open(test_config(&temp_dir));

        assert!(store.is_initialized());
        assert!(store.books().is_empty());
        assert!(store.reading_goals().is_empty());
        assert!(store.reading_lists().is_empty());
    }

    #[test]
    fn test_load_twice_is_a_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        store.add_book(new_book("Dune"));
        store.load();

        assert_eq!(store.books().len(), 1);
    }

    #[test]
    fn test_add_book_assigns_unique_ids() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let a = store.add_book(new_book("Dune"));
        let b = store.add_book(new_book("Dune"));

        // Duplicate titles are allowed; ids still differ
        assert_ne!(a, b);
        assert_eq!(store.books().len(), 2);
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let id;
        {
            let mut store = BookStore::open(config.clone());
            id = store.add_book(new_book("Dune"));
            store.add_reading_goal(NewReadingGoal {
                year: 2025,
                target_books: 12,
                current_books: 0,
            });
            store.create_reading_list("Favorites");
        }

        let store = BookStore::open(config);
        assert_eq!(store.books().len(), 1);
        assert_eq!(store.book(id).unwrap().title, "Dune");
        assert_eq!(store.reading_goals().len(), 1);
        assert_eq!(store.reading_lists().len(), 1);
    }

    #[test]
    fn test_update_book_merges_patch() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let id = store.add_book(new_book("Dune"));
        store.update_book(
            id,
            BookPatch {
                rating: Some(5),
                notes: Some("Reread soon".to_string()),
                ..BookPatch::default()
            },
        );

        let book = store.book(id).unwrap();
        assert_eq!(book.rating, Some(5));
        assert_eq!(book.notes.as_deref(), Some("Reread soon"));
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn test_update_book_preserves_date_added() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let id = store.add_book(new_book("Dune"));
        let date_added = store.book(id).unwrap().date_added;

        std::thread::sleep(std::time::Duration::from_millis(10));
        store.update_book(
            id,
            BookPatch {
                title: Some("Dune Messiah".to_string()),
                ..BookPatch::default()
            },
        );

        assert_eq!(store.book(id).unwrap().date_added, date_added);
    }

    #[test]
    fn test_update_unknown_id_is_a_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        store.add_book(new_book("Dune"));
        store.update_book(
            Uuid::now_v7(),
            BookPatch {
                title: Some("Ghost".to_string()),
                ..BookPatch::default()
            },
        );
        store.delete_book(Uuid::now_v7());
        store.toggle_favorite(Uuid::now_v7());
        store.update_reading_status(Uuid::now_v7(), ReadingStatus::Read);
        store.update_reading_progress(Uuid::now_v7(), 10);

        assert_eq!(store.books().len(), 1);
        assert_eq!(store.books()[0].title, "Dune");
    }

    #[test]
    fn test_delete_book_does_not_cascade_into_lists() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let book_id = store.add_book(new_book("Dune"));
        let list_id = store.create_reading_list("To read");
        store.add_book_to_list(list_id, book_id);

        store.delete_book(book_id);

        assert!(store.book(book_id).is_none());
        // The dangling reference stays; consumers filter it at render time
        assert_eq!(store.reading_list(list_id).unwrap().books, vec![book_id]);
    }

    #[test]
    fn test_toggle_favorite() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let id = store.add_book(new_book("Dune"));
        assert!(!store.book(id).unwrap().is_favorite);

        store.toggle_favorite(id);
        assert!(store.book(id).unwrap().is_favorite);

        store.toggle_favorite(id);
        assert!(!store.book(id).unwrap().is_favorite);
    }

    #[test]
    fn test_ownership_revert_clears_reading_fields() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let id = store.add_book(NewBook {
            page_count: Some(400),
            ownership: Ownership::Owned,
            ..new_book("Dune")
        });
        store.update_reading_status(id, ReadingStatus::CurrentlyReading);
        store.update_reading_progress(id, 120);

        store.update_book_ownership(id, Ownership::WantToHave);

        let book = store.book(id).unwrap();
        assert_eq!(book.ownership, Ownership::WantToHave);
        assert!(book.reading_status.is_none());
        assert!(book.current_page.is_none());
        assert!(book.date_started.is_none());
        assert!(book.date_finished.is_none());
    }

    #[test]
    fn test_ownership_to_owned_changes_nothing_else() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let id = store.add_book(new_book("Dune"));
        store.update_book_ownership(id, Ownership::Owned);

        let book = store.book(id).unwrap();
        assert_eq!(book.ownership, Ownership::Owned);
        assert!(book.reading_status.is_none());
    }

    #[test]
    fn test_date_started_stamped_once() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let id = store.add_book(NewBook {
            ownership: Ownership::Owned,
            ..new_book("Dune")
        });

        store.update_reading_status(id, ReadingStatus::CurrentlyReading);
        let started = store.book(id).unwrap().date_started.unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        store.update_reading_status(id, ReadingStatus::CurrentlyReading);

        assert_eq!(store.book(id).unwrap().date_started.unwrap(), started);
    }

    #[test]
    fn test_date_finished_refreshed_on_reread() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let id = store.add_book(NewBook {
            ownership: Ownership::Owned,
            ..new_book("Dune")
        });

        store.update_reading_status(id, ReadingStatus::Read);
        let first = store.book(id).unwrap().date_finished.unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        store.update_reading_status(id, ReadingStatus::Read);

        assert!(store.book(id).unwrap().date_finished.unwrap() > first);
    }

    #[test]
    fn test_progress_reaching_page_count_marks_read() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let id = store.add_book(NewBook {
            page_count: Some(300),
            ownership: Ownership::Owned,
            reading_status: Some(ReadingStatus::CurrentlyReading),
            ..new_book("Dune")
        });

        store.update_reading_progress(id, 150);
        let book = store.book(id).unwrap();
        assert_eq!(book.current_page, Some(150));
        assert_eq!(book.reading_status, Some(ReadingStatus::CurrentlyReading));
        assert!(book.date_finished.is_none());

        store.update_reading_progress(id, 300);
        let book = store.book(id).unwrap();
        assert_eq!(book.reading_status, Some(ReadingStatus::Read));
        assert!(book.date_finished.is_some());
    }

    #[test]
    fn test_progress_without_page_count_never_completes() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let id = store.add_book(NewBook {
            ownership: Ownership::Owned,
            reading_status: Some(ReadingStatus::CurrentlyReading),
            ..new_book("Dune")
        });

        store.update_reading_progress(id, 9999);

        let book = store.book(id).unwrap();
        assert_eq!(book.current_page, Some(9999));
        assert_eq!(book.reading_status, Some(ReadingStatus::CurrentlyReading));
    }

    #[test]
    fn test_filtered_books_without_filters_returns_all_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        store.add_book(new_book("One"));
        store.add_book(new_book("Two"));
        store.add_book(new_book("Three"));

        let titles: Vec<_> = store.filtered_books().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_filtered_books_by_search() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        store.add_book(new_book("Dune"));
        store.add_book(NewBook {
            authors: vec!["Asimov".to_string()],
            ..new_book("Foundation")
        });

        store.set_filters(BookFilters {
            search: Some("dune".to_string()),
            ..BookFilters::default()
        });

        let titles: Vec<_> = store.filtered_books().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune"]);

        store.clear_filters();
        assert_eq!(store.filtered_books().len(), 2);
    }

    #[test]
    fn test_books_by_ownership_and_status() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let owned = store.add_book(NewBook {
            ownership: Ownership::Owned,
            ..new_book("Owned")
        });
        store.add_book(new_book("Wanted"));
        store.update_reading_status(owned, ReadingStatus::Read);

        assert_eq!(store.books_by_ownership(Ownership::Owned).len(), 1);
        assert_eq!(store.books_by_ownership(Ownership::WantToHave).len(), 1);
        assert_eq!(store.books_by_reading_status(ReadingStatus::Read).len(), 1);
        assert!(store
            .books_by_reading_status(ReadingStatus::CurrentlyReading)
            .is_empty());
    }

    #[test]
    fn test_related_books_by_author_or_category() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let target = store.add_book(NewBook {
            authors: vec!["Frank Herbert".to_string()],
            categories: Some(vec!["Science Fiction".to_string()]),
            ..new_book("Dune")
        });
        store.add_book(NewBook {
            authors: vec!["Frank Herbert".to_string()],
            ..new_book("Dune Messiah")
        });
        store.add_book(NewBook {
            authors: vec!["Ursula K. Le Guin".to_string()],
            categories: Some(vec!["Science Fiction".to_string()]),
            ..new_book("The Dispossessed")
        });
        store.add_book(NewBook {
            authors: vec!["Jane Austen".to_string()],
            categories: Some(vec!["Romance".to_string()]),
            ..new_book("Persuasion")
        });

        let related: Vec<_> = store
            .related_books(target)
            .iter()
            .map(|b| b.title.clone())
            .collect();
        assert_eq!(related, vec!["Dune Messiah", "The Dispossessed"]);
    }

    #[test]
    fn test_related_books_excludes_target_and_caps_at_six() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let target = store.add_book(NewBook {
            authors: vec!["Frank Herbert".to_string()],
            ..new_book("Dune")
        });
        for i in 0..8 {
            store.add_book(NewBook {
                authors: vec!["Frank Herbert".to_string()],
                ..new_book(&format!("Book {}", i))
            });
        }

        let related = store.related_books(target);
        assert_eq!(related.len(), 6);
        assert!(related.iter().all(|b| b.id != target));
    }

    #[test]
    fn test_related_books_unknown_id_returns_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        store.add_book(new_book("Dune"));
        assert!(store.related_books(Uuid::now_v7()).is_empty());
    }

    #[test]
    fn test_stats_empty_collection() {
        let temp_dir = TempDir::new().unwrap();
        let store = BookStore::open(test_config(&temp_dir));

        assert_eq!(store.stats(), LibraryStats::default());
    }

    #[test]
    fn test_stats_counts() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        store.add_book(NewBook {
            ownership: Ownership::Owned,
            reading_status: Some(ReadingStatus::Read),
            ..new_book("Dune")
        });

        assert_eq!(
            store.stats(),
            LibraryStats {
                total: 1,
                owned: 1,
                want_to_have: 0,
                read: 1,
                reading: 0,
                want_to_read: 0,
            }
        );
    }

    #[test]
    fn test_reading_goal_crud() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let id = store.add_reading_goal(NewReadingGoal {
            year: 2025,
            target_books: 12,
            current_books: 3,
        });

        let goal = &store.reading_goals()[0];
        assert_eq!(goal.year, 2025);
        assert_eq!(goal.target_books, 12);
        assert_eq!(goal.current_books, 3);

        store.update_reading_goal(
            id,
            ReadingGoalPatch {
                target_books: Some(20),
                ..ReadingGoalPatch::default()
            },
        );
        assert_eq!(store.reading_goals()[0].target_books, 20);
        // Snapshot is not auto-updated
        assert_eq!(store.reading_goals()[0].current_books, 3);

        store.delete_reading_goal(id);
        assert!(store.reading_goals().is_empty());
    }

    #[test]
    fn test_store_accepts_duplicate_goal_years() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        // Year uniqueness is enforced by callers, not here
        store.add_reading_goal(NewReadingGoal {
            year: 2025,
            target_books: 12,
            current_books: 0,
        });
        store.add_reading_goal(NewReadingGoal {
            year: 2025,
            target_books: 24,
            current_books: 0,
        });

        assert_eq!(store.reading_goals().len(), 2);
    }

    #[test]
    fn test_reading_list_crud_and_membership() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let a = store.add_book(new_book("A"));
        let b = store.add_book(new_book("B"));

        let list_id = store.create_reading_list("Summer");
        store.add_book_to_list(list_id, a);
        store.add_book_to_list(list_id, b);
        // Second add of a member is a no-op
        store.add_book_to_list(list_id, a);
        assert_eq!(store.reading_list(list_id).unwrap().books, vec![a, b]);

        store.reorder_list(list_id, vec![b, a]);
        assert_eq!(store.reading_list(list_id).unwrap().books, vec![b, a]);

        store.remove_book_from_list(list_id, b);
        assert_eq!(store.reading_list(list_id).unwrap().books, vec![a]);

        store.rename_reading_list(list_id, "Autumn");
        assert_eq!(store.reading_list(list_id).unwrap().name, "Autumn");

        store.delete_reading_list(list_id);
        assert!(store.reading_list(list_id).is_none());
    }

    #[test]
    fn test_list_mutations_refresh_updated_at() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        let book = store.add_book(new_book("A"));
        let list_id = store.create_reading_list("Summer");
        let created = store.reading_list(list_id).unwrap().updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        store.add_book_to_list(list_id, book);

        assert!(store.reading_list(list_id).unwrap().updated_at > created);
    }

    #[test]
    fn test_import_books_replaces_wholesale() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookStore::open(test_config(&temp_dir));

        store.add_book(new_book("Old"));

        let replacement = vec![Book::new(new_book("New"))];
        store.import_books(replacement.clone());

        assert_eq!(store.books(), replacement.as_slice());

        // The replacement is what persists
        let reopened = BookStore::open(test_config(&temp_dir));
        assert_eq!(reopened.books().len(), 1);
        assert_eq!(reopened.books()[0].title, "New");
    }

    #[test]
    fn test_apply_ownership_transition_is_pure_of_other_fields() {
        let mut book = Book::new(NewBook {
            ownership: Ownership::Owned,
            reading_status: Some(ReadingStatus::Read),
            rating: Some(5),
            ..new_book("Dune")
        });
        book.current_page = Some(400);
        book.date_started = Some(Utc::now());
        book.date_finished = Some(Utc::now());

        apply_ownership_transition(&mut book, Ownership::WantToHave);

        assert!(book.reading_status.is_none());
        assert!(book.current_page.is_none());
        assert!(book.date_started.is_none());
        assert!(book.date_finished.is_none());
        // Everything outside the reading-status group is untouched
        assert_eq!(book.rating, Some(5));
        assert_eq!(book.title, "Dune");
    }
}
