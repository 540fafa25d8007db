//! Durable Key/Value Storage
//!
//! String keys to string values, the same contract as browser local storage,
//! with one addition: writes and removals are applied as a batch so callers
//! that keep several keys in step never leave a half-written state behind.
//!
//! The file backend keeps all entries in one JSON object and replaces the
//! file with a rename from a uniquely named temp file, so readers see either
//! the old or the new document. Several processes may share a file; the last
//! writer wins.

use std::collections::BTreeMap;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// One batched change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Set(String, String),
    Remove(String),
}

impl Write {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Write::Set(key.into(), value.into())
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Write::Remove(key.into())
    }
}

/// Key/value storage trait
#[trait_variant::make(KeyValueStore: Send)]
pub trait LocalKeyValueStore {
    /// Read one entry
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Read several entries from one snapshot, in `keys` order
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError>;

    /// Apply all writes, or none of them
    async fn apply(&self, writes: &[Write]) -> Result<(), StorageError>;
}

fn apply_to(entries: &mut BTreeMap<String, String>, writes: &[Write]) {
    for write in writes {
        match write {
            Write::Set(key, value) => {
                entries.insert(key.clone(), value.clone());
            }
            Write::Remove(key) => {
                entries.remove(key);
            }
        }
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Process-local storage. Lost on exit; used by tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(keys.iter().map(|key| entries.get(*key).cloned()).collect())
    }

    async fn apply(&self, writes: &[Write]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        apply_to(&mut entries, writes);
        Ok(())
    }
}

// ============================================================================
// File
// ============================================================================

/// Storage backed by a single JSON file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileKeyValueStore {
    /// Use `path` as the storage file. Nothing is created until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await?;

        let bytes = serde_json::to_vec_pretty(entries)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            // unique per writer, so concurrent writers never share a temp file
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StorageError::Io(io::Error::other(e)))?
    }
}

impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.read_all().await?;
        Ok(entries.remove(key))
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError> {
        let entries = self.read_all().await?;
        Ok(keys.iter().map(|key| entries.get(*key).cloned()).collect())
    }

    async fn apply(&self, writes: &[Write]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read_all().await?;
        apply_to(&mut entries, writes);
        self.write_all(&entries).await?;

        tracing::trace!(path = %self.path.display(), writes = writes.len(), "Storage updated");
        Ok(())
    }
}
