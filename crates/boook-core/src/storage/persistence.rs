//! Slot persistence
//!
//! Each key maps to one JSON file under the data directory
//! (`<data_dir>/<key>.json`). Writes are atomic (write to temp file, then
//! rename) to prevent corruption.
//!
//! The public surface never fails: serialization or storage-medium failures
//! are logged and degrade to the caller-supplied default (`get`) or to a
//! no-op (`set`/`remove`). Operations on different keys are independent;
//! there is no atomicity across slots.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::storage::error::{StorageError, StorageResult};

/// Key-value storage over per-key JSON file slots
pub struct SlotStorage {
    config: Config,
}

impl SlotStorage {
    /// Create a storage handle with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Serialize `value` into the slot, overwriting any prior contents
    ///
    /// Failures are logged and swallowed.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_set(key, value) {
            warn!(key, error = %e, "failed to persist slot");
        }
    }

    /// Deserialize the slot's contents, or `default` if absent or unparsable
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!(key, error = %e, "failed to read slot, using default");
                default
            }
        }
    }

    /// Delete the slot
    ///
    /// Failures are logged and swallowed; removing a missing slot is a no-op.
    pub fn remove(&self, key: &str) {
        let path = self.slot_path(key);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!(key, error = %e, "failed to remove slot");
            }
        }
    }

    /// Whether the slot exists
    pub fn has(&self, key: &str) -> bool {
        self.slot_path(key).exists()
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.config.slot_path(key)
    }

    fn try_set<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let path = self.slot_path(key);
        let json = serde_json::to_vec(value).map_err(|source| StorageError::InvalidJson {
            path: path.clone(),
            source,
        })?;
        atomic_write(&path, &json)
    }

    fn try_get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let path = self.slot_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|source| StorageError::ReadError {
            path: path.clone(),
            source,
        })?;

        let value =
            serde_json::from_slice(&bytes).map_err(|source| StorageError::InvalidJson {
                path: path.clone(),
                source,
            })?;

        Ok(Some(value))
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
