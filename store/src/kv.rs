use std::fs;
use std::path::{Path, PathBuf};

use logger::Logger;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;

/// A string-keyed store of JSON-serialized values, kept as one `<key>.json`
/// file per key under a data directory.
///
/// Reads of missing keys yield `None` and callers fall back to an empty
/// default. Malformed contents are treated the same way: the value is
/// discarded with a logged warning rather than failing the operation.
/// Writes replace the whole value (last write wins).
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    dir: PathBuf,
    logger: Logger,
}

impl KeyValueStore {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path, logger: Logger) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(KeyValueStore {
            dir: dir.to_path_buf(),
            logger,
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys become file names, so keep separators out of them
        let sanitized = key.replace(['/', '\\'], "_");
        self.dir.join(format!("{}.json", sanitized))
    }

    /// Reads the value stored under `key`, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                let _ = self.logger.warn(
                    &format!("Discarding malformed stored value for key '{}': {}", key, e),
                    false,
                );
                Ok(None)
            }
        }
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(self.key_path(key), raw)?;
        Ok(())
    }

    /// Removes the value stored under `key`. Removing a missing key is a no-op.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
