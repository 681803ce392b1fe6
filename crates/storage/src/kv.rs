//! The raw key-value persistence contract.
//!
//! Everything durable lives under a handful of fixed logical keys, each
//! holding one UTF-8 JSON document. Operations are synchronous; there is no
//! background I/O.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::repository::StorageError;

/// Logical keys addressed by the repositories.
pub mod keys {
    /// Ordered list of registered users.
    pub const USERS: &str = "users";
    /// The single active session; an absent key means logged out.
    pub const CURRENT_USER: &str = "current_user";
    /// Map from user id to that user's progress record.
    pub const USER_PROGRESS: &str = "user_progress";
}

/// A durable, synchronous key-value store scoped to one client.
pub trait KeyValueStore: Send + Sync {
    /// Reads the document stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the store cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key` entirely. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store implementation for testing and prototyping.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}
