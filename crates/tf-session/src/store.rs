//! Key-value persistence backends for save slots.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A key that cannot be mapped onto the backend.
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    /// Underlying I/O failure.
    #[error("store I/O error for key {key:?}: {source}")]
    Io {
        /// The key being read or written.
        key: String,
        /// What the filesystem reported.
        #[source]
        source: io::Error,
    },
}

/// Async string key-value storage for save blobs.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: String) -> StoreResult<()>;

    /// Delete a value. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// A store that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// A store that keeps one `<key>.json` file per key in a directory.
///
/// The directory is created on the first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store that writes into `dir`, created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory saves are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file backing `key`. Keys are limited to ASCII letters, digits,
    /// `-` and `_` so they cannot escape the directory.
    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(key: &str, source: io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| io_error(key, e))
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("slot").await.unwrap(), None);

        store.set("slot", "one".into()).await.unwrap();
        store.set("slot", "two".into()).await.unwrap();
        assert_eq!(store.get("slot").await.unwrap().as_deref(), Some("two"));

        store.remove("slot").await.unwrap();
        store.remove("slot").await.unwrap();
        assert_eq!(store.get("slot").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("saves"));
        assert_eq!(store.get("quicksave").await.unwrap(), None);

        store.set("quicksave", "{}".into()).await.unwrap();
        assert!(dir.path().join("saves/quicksave.json").exists());
        assert_eq!(
            store.get("quicksave").await.unwrap().as_deref(),
            Some("{}")
        );

        store.remove("quicksave").await.unwrap();
        assert_eq!(store.get("quicksave").await.unwrap(), None);
        store.remove("quicksave").await.unwrap();
    }

    #[tokio::test]
    async fn file_store_rejects_path_like_keys() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        for key in ["", "../escape", "a/b", "slot.json"] {
            assert!(matches!(
                store.set(key, "x".into()).await,
                Err(StoreError::InvalidKey(_))
            ));
        }
    }
}
