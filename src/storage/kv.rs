//! Key-value storage backends
//!
//! Ledger data lives in a small durable key-value store, one value per fixed
//! key (see [`PEOPLE_KEY`], [`EXPENSES_KEY`] and [`PAID_KEY`]). Repositories only see the
//! [`KeyValueStore`] trait, so the same code runs against files on disk or an
//! in-memory map.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{SplitbookError, SplitbookResult};

use super::file_io::write_atomic;

/// Key holding the JSON array of participants
pub const PEOPLE_KEY: &str = "quick_people";

/// Key holding the JSON array of expenses
pub const EXPENSES_KEY: &str = "quick_expenses";

/// Key holding the JSON array of settlement pairs marked as paid
pub const PAID_KEY: &str = "quick_paid";

/// A durable string-to-string store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> SplitbookResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> SplitbookResult<()>;

    /// Remove `key`; returns whether it existed
    fn remove(&self, key: &str) -> SplitbookResult<bool>;

    /// All keys currently present, sorted
    fn keys(&self) -> SplitbookResult<Vec<String>>;
}

/// Read and deserialize a JSON value, or `T::default()` when the key is absent
pub fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> SplitbookResult<T>
where
    T: DeserializeOwned + Default,
{
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| SplitbookError::Storage(format!("Failed to parse '{}': {}", key, e))),
        None => Ok(T::default()),
    }
}

/// Serialize a value as JSON and store it under `key`
pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> SplitbookResult<()> {
    let raw = serde_json::to_string_pretty(value)
        .map_err(|e| SplitbookError::Storage(format!("Failed to serialize '{}': {}", key, e)))?;
    store.set(key, &raw)
}

fn validate_key(key: &str) -> SplitbookResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SplitbookError::Storage(format!("Invalid storage key: '{}'", key)))
    }
}

/// Stores each key as `<key>.json` inside one directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> SplitbookResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> SplitbookResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path).map(Some).map_err(|e| {
            SplitbookError::Storage(format!("Failed to read {}: {}", path.display(), e))
        })
    }

    fn set(&self, key: &str, value: &str) -> SplitbookResult<()> {
        let path = self.path_for(key)?;
        write_atomic(path, value.as_bytes())
    }

    fn remove(&self, key: &str) -> SplitbookResult<bool> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| {
            SplitbookError::Storage(format!("Failed to remove {}: {}", path.display(), e))
        })?;
        Ok(true)
    }

    fn keys(&self) -> SplitbookResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            SplitbookError::Storage(format!("Failed to list {}: {}", self.dir.display(), e))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Volatile store, for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> SplitbookResult<Option<String>> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SplitbookResult<()> {
        validate_key(key)?;
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SplitbookResult<bool> {
        let mut data = self.data.write().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        Ok(data.remove(key).is_some())
    }

    fn keys(&self) -> SplitbookResult<Vec<String>> {
        let data = self.data.read().map_err(|e| {
            SplitbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.keys().cloned().collect())
    }
}
