//! Local snapshot persistence.
//!
//! The session and wishlist containers persist their state as serialized
//! snapshots under fixed keys, the way a browser profile holds local storage.
//! [`SnapshotStore`] is the capability both containers share; the production
//! implementation is [`FileStore`] (one file per key under a data directory),
//! and tests use [`MemoryStore`].
//!
//! Snapshots are plain structured-text blobs with no version field. Readers
//! must tolerate absent or partial fields; a blob that fails to parse is
//! treated as absent, never as a fatal error.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Fixed keys for persisted snapshots.
pub mod keys {
    /// Key for the serialized session snapshot.
    pub const SESSION: &str = "lookbook_session";

    /// Key for the serialized wishlist entry array.
    pub const WISHLIST: &str = "lookbook_wishlist";
}

/// Errors raised by snapshot persistence.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Underlying filesystem operation failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] io::Error),

    /// A key contained characters unsafe for a file name.
    #[error("invalid snapshot key: {0}")]
    InvalidKey(String),
}

/// Synchronous key/value persistence for container snapshots.
///
/// Writes are synchronous and visible to the next `get` in the same process.
/// Nothing coordinates writers across processes sharing a data directory;
/// last writer wins.
pub trait SnapshotStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures; a missing key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, SnapshotError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<(), SnapshotError>;

    /// Remove the blob stored under `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails for reasons other than absence.
    fn remove(&self, key: &str) -> Result<(), SnapshotError>;
}

/// File-backed snapshot store: one file per key under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SnapshotError> {
        // Keys are fixed application constants, but refuse anything that
        // would escape the data directory if one ever isn't.
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(SnapshotError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), SnapshotError> {
        let path = self.path_for(key)?;
        // Write-then-rename so a crash mid-write never leaves a torn blob.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SnapshotError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory snapshot store for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with key/value pairs.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), SnapshotError> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SnapshotError> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert!(store.get(keys::SESSION).unwrap().is_none());

        store.put(keys::SESSION, r#"{"email":"u@e.com"}"#).unwrap();
        assert_eq!(
            store.get(keys::SESSION).unwrap().as_deref(),
            Some(r#"{"email":"u@e.com"}"#)
        );

        store.remove(keys::SESSION).unwrap();
        assert!(store.get(keys::SESSION).unwrap().is_none());
    }

    #[test]
    fn test_file_store_remove_absent_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store.remove("never_written").unwrap();
    }

    #[test]
    fn test_file_store_rejects_path_escaping_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.get("../etc/passwd"),
            Err(SnapshotError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_file_store_overwrite_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store.put(keys::WISHLIST, "[1]").unwrap();
        store.put(keys::WISHLIST, "[1,2]").unwrap();
        assert_eq!(store.get(keys::WISHLIST).unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }
}
