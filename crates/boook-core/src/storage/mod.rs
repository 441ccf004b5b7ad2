//! Durable slot storage
//!
//! One JSON-encoded slot per key, written through on every store mutation.

mod error;
mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::SlotStorage;

/// Slot holding the book collection
pub const BOOKS_KEY: &str = "boook_books";
/// Slot holding the reading goals
pub const GOALS_KEY: &str = "boook_reading_goals";
/// Slot holding the reading lists
pub const LISTS_KEY: &str = "boook_reading_lists";
/// Slot holding the user's display name
pub const USER_NAME_KEY: &str = "boook_user_name";
/// Slot holding the onboarding-completion flag
pub const ONBOARDING_KEY: &str = "boook_onboarding_complete";
