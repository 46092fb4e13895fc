//! Persistence - key/value snapshots of the three collections
//!
//! The core only needs get/set by key. Blobs are JSON arrays. A missing key
//! and a malformed blob both read as an empty collection.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Keys of the stored collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Stock,
    ShoppingList,
    Recipes,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Stock => "pantry_items",
            StoreKey::ShoppingList => "shopping_list",
            StoreKey::Recipes => "recipes",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the persistence adapter
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read '{key}': {source}")]
    Read {
        key: StoreKey,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{key}': {source}")]
    Write {
        key: StoreKey,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize '{key}': {source}")]
    Serialize {
        key: StoreKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Get/set-by-key storage for collection blobs
pub trait Store {
    /// The stored blob, or `None` when the key was never written
    fn load(&self, key: StoreKey) -> Result<Option<String>, StorageError>;

    fn save(&mut self, key: StoreKey, blob: &str) -> Result<(), StorageError>;
}

/// Load and decode a collection
///
/// `Ok(None)` for a missing key; a blob that fails to decode is logged and
/// read as `T::default()`.
pub fn load_collection<T, S>(store: &S, key: StoreKey) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned + Default,
    S: Store + ?Sized,
{
    let Some(blob) = store.load(key)? else {
        debug!(%key, "No stored collection");
        return Ok(None);
    };
    match serde_json::from_str(&blob) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(%key, error = %e, "Stored collection is malformed, starting empty");
            Ok(Some(T::default()))
        }
    }
}

/// Encode and save a collection
pub fn save_collection<T, S>(store: &mut S, key: StoreKey, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: Store + ?Sized,
{
    let blob = serde_json::to_string_pretty(value)
        .map_err(|source| StorageError::Serialize { key, source })?;
    store.save(key, &blob)
}

/// One `<key>.json` file per collection inside a directory
#[derive(Debug, Clone)]
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

    fn path(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Store for FileStore {
    fn load(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        let bytes = match fs::read(self.path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Read { key, source }),
        };
        match String::from_utf8(bytes) {
            Ok(content) => Ok(Some(content)),
            Err(e) => {
                // a lossy decode never parses, so the collection reads as empty
                warn!(%key, error = %e, "Stored collection is not valid UTF-8");
                Ok(Some(String::from_utf8_lossy(e.as_bytes()).into_owned()))
            }
        }
    }

    fn save(&mut self, key: StoreKey, blob: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write { key, source })?;

        // readers never observe a partially written file
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob).map_err(|source| StorageError::Write { key, source })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Write { key, source })?;
        debug!(%key, path = %path.display(), "Saved collection");
        Ok(())
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<StoreKey, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.get(&key).cloned())
    }

    fn save(&mut self, key: StoreKey, blob: &str) -> Result<(), StorageError> {
        self.blobs.insert(key, blob.to_string());
        Ok(())
    }
}
