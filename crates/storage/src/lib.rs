#![forbid(unsafe_code)]

pub mod json_file;
pub mod kv;
pub mod repository;

pub use json_file::{JsonFileStore, JsonFileStoreError};
pub use kv::{KeyValueStore, MemoryStore};
pub use repository::{
    ProgressRepository, SessionRepository, Storage, StorageError, UserRepository,
};
