//! File-backed key-value store: one JSON document per logical key.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::kv::KeyValueStore;
use crate::repository::StorageError;

/// Errors raised while opening a [`JsonFileStore`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonFileStoreError {
    #[error("failed to prepare data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Durable store keeping each logical key in `<dir>/<key>.json`.
///
/// The directory is the persistence scope: two stores opened on the same
/// directory see the same data, stores on different directories are fully
/// isolated.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `JsonFileStoreError::CreateDir` if the directory cannot be
    /// created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, JsonFileStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| JsonFileStoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Backend(err.to_string())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value).map_err(|err| StorageError::Backend(err.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Backend(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_before_any_write_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.read("users").unwrap(), None);
    }

    #[test]
    fn write_creates_a_json_file_per_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.write("users", "[]").unwrap();

        assert!(dir.path().join("users.json").exists());
        assert_eq!(store.read("users").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn remove_deletes_the_file_and_tolerates_absence() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.write("current_user", "{}").unwrap();

        store.remove("current_user").unwrap();
        assert!(!dir.path().join("current_user.json").exists());
        store.remove("current_user").unwrap();
    }

    #[test]
    fn open_creates_nested_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonFileStore::open(&nested).unwrap();
        store.write("users", "[]").unwrap();
        assert!(nested.join("users.json").exists());
    }
}
