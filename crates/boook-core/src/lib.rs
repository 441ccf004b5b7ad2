//! boook Core Library
//!
//! This crate provides the core functionality for boook, a local-first
//! personal book collection tracker.
//!
//! # Architecture
//!
//! The [`BookStore`] is the single owner of the in-memory collections
//! (books, reading goals, reading lists). Every mutation is mirrored to
//! durable per-key JSON slots (write-through); derived views (filters,
//! statistics, related books) are recomputed from the authoritative
//! collection on every access.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = BookStore::open(Config::load()?);
//!
//! // Catalog a book
//! let id = store.add_book(NewBook {
//!     title: "Dune".to_string(),
//!     authors: vec!["Frank Herbert".to_string()],
//!     ..NewBook::default()
//! });
//!
//! // Track progress
//! store.update_reading_status(id, ReadingStatus::CurrentlyReading);
//! ```
//!
//! # Modules
//!
//! - `store`: the book collection store (main entry point)
//! - `models`: data structures for books, goals, lists, and derived views
//! - `storage`: durable slot persistence
//! - `profile`: display-name and onboarding slots
//! - `backup`: export/import surface
//! - `config`: application configuration

pub mod backup;
pub mod config;
pub mod models;
pub mod profile;
pub mod storage;
pub mod store;

pub use backup::{BackupDocument, BackupError};
pub use config::Config;
pub use models::{
    Book, BookFilters, BookPatch, LibraryStats, NewBook, NewReadingGoal, Ownership, ReadingGoal,
    ReadingGoalPatch, ReadingList, ReadingStatus,
};
pub use profile::Profile;
pub use storage::{SlotStorage, StorageError};
pub use store::{apply_ownership_transition, BookStore};
