//! Backup export and restore
//!
//! Serializes the book collection (plus the profile display name) into a
//! single JSON document, and restores such a document wholesale. Import is a
//! schema-checked parse: a structurally invalid document is rejected with a
//! typed error and nothing is applied. There is no merging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Book;
use crate::profile::Profile;
use crate::store::BookStore;

/// Version stamp written into exported documents
pub const BACKUP_VERSION: &str = "1.0";

/// A user-facing backup document
///
/// `books` is the contract; the remaining fields are metadata and tolerated
/// when absent, so documents from older exports still restore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub books: Vec<Book>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Import failures
#[derive(Error, Debug)]
pub enum BackupError {
    /// Not valid JSON, or the shape does not match a backup document
    #[error("Invalid backup document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Serialize the current collection and profile into a backup document
pub fn export_backup(store: &BookStore, profile: &Profile) -> Result<String, BackupError> {
    let doc = BackupDocument {
        books: store.books().to_vec(),
        user_name: profile.display_name(),
        export_date: Some(Utc::now()),
        version: Some(BACKUP_VERSION.to_string()),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse a backup document, rejecting any structural mismatch
pub fn parse_backup(json: &str) -> Result<BackupDocument, BackupError> {
    Ok(serde_json::from_str(json)?)
}

/// Overwrite the book collection (and profile name, when present) wholesale
pub fn restore_backup(doc: BackupDocument, store: &mut BookStore, profile: &Profile) {
    if let Some(ref name) = doc.user_name {
        profile.set_display_name(name);
    }
    store.import_books(doc.books);
}
