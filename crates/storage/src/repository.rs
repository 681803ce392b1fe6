use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use learnhub_core::model::{CourseId, LessonId, ProgressRecord, Session, User, UserId};

use crate::json_file::{JsonFileStore, JsonFileStoreError};
use crate::kv::{KeyValueStore, MemoryStore, keys};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape for a user account.
///
/// This mirrors the domain `User` so repositories can serialize/deserialize
/// without leaking storage concerns into the domain layer. Timestamps are
/// written as ISO-8601 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id().clone(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            password: user.password().to_owned(),
            created_at: user.created_at(),
        }
    }

    #[must_use]
    pub fn into_user(self) -> User {
        User::from_persisted(self.id, self.name, self.email, self.password, self.created_at)
    }
}

/// Persisted shape for the active session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub login_time: DateTime<Utc>,
}

impl SessionRecord {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            user_id: session.user_id().clone(),
            name: session.name().to_owned(),
            email: session.email().to_owned(),
            login_time: session.login_time(),
        }
    }

    #[must_use]
    pub fn into_session(self) -> Session {
        Session::from_persisted(self.user_id, self.name, self.email, self.login_time)
    }
}

/// Completed lessons for one course, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgressRecord {
    pub completed_lessons: Vec<LessonId>,
}

/// Persisted shape for one user's progress record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecordData {
    pub courses: BTreeMap<CourseId, CourseProgressRecord>,
    pub last_updated: DateTime<Utc>,
}

impl ProgressRecordData {
    #[must_use]
    pub fn from_record(record: &ProgressRecord) -> Self {
        let courses = record
            .courses()
            .iter()
            .map(|(course, lessons)| {
                let completed_lessons = lessons.iter().copied().collect();
                (*course, CourseProgressRecord { completed_lessons })
            })
            .collect();
        Self {
            courses,
            last_updated: record.last_updated(),
        }
    }

    #[must_use]
    pub fn into_record(self) -> ProgressRecord {
        let courses = self
            .courses
            .into_iter()
            .map(|(course, entry)| {
                let lessons: BTreeSet<LessonId> = entry.completed_lessons.into_iter().collect();
                (course, lessons)
            })
            .collect();
        ProgressRecord::from_persisted(courses, self.last_updated)
    }
}

//
// ─── REPOSITORIES ──────────────────────────────────────────────────────────────
//

/// Repository contract for registered users.
pub trait UserRepository: Send + Sync {
    /// All users, in registration order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the user list cannot be loaded.
    fn list(&self) -> Result<Vec<User>, StorageError>;

    /// Appends a user to the persisted list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the user list cannot be stored.
    fn append(&self, user: &User) -> Result<(), StorageError>;
}

/// Repository contract for the single active session.
pub trait SessionRepository: Send + Sync {
    /// The active session, if anyone is logged in.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be loaded.
    fn current(&self) -> Result<Option<Session>, StorageError>;

    /// Replaces any existing session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    fn replace(&self, session: &Session) -> Result<(), StorageError>;

    /// Clears the session. Clearing an absent session is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be removed.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Repository contract for per-user progress records.
pub trait ProgressRepository: Send + Sync {
    /// The stored record for `user_id`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if progress data cannot be loaded.
    fn get(&self, user_id: &UserId) -> Result<Option<ProgressRecord>, StorageError>;

    /// Stores `record` for `user_id`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if progress data cannot be stored.
    fn put(&self, user_id: &UserId, record: &ProgressRecord) -> Result<(), StorageError>;
}

/// Implements every repository contract over a raw key-value store.
#[derive(Clone)]
pub struct KvRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvRepository {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read_json<T>(&self, key: &str) -> Result<Option<T>, StorageError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.store.read(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.write(key, &raw)
    }

    fn read_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        Ok(self.read_json(keys::USERS)?.unwrap_or_default())
    }

    fn read_all_progress(&self) -> Result<BTreeMap<UserId, ProgressRecordData>, StorageError> {
        Ok(self.read_json(keys::USER_PROGRESS)?.unwrap_or_default())
    }
}

impl UserRepository for KvRepository {
    fn list(&self) -> Result<Vec<User>, StorageError> {
        let records = self.read_users()?;
        Ok(records.into_iter().map(UserRecord::into_user).collect())
    }

    fn append(&self, user: &User) -> Result<(), StorageError> {
        let mut records = self.read_users()?;
        records.push(UserRecord::from_user(user));
        self.write_json(keys::USERS, &records)
    }
}

impl SessionRepository for KvRepository {
    fn current(&self) -> Result<Option<Session>, StorageError> {
        let record: Option<SessionRecord> = self.read_json(keys::CURRENT_USER)?;
        Ok(record.map(SessionRecord::into_session))
    }

    fn replace(&self, session: &Session) -> Result<(), StorageError> {
        self.write_json(keys::CURRENT_USER, &SessionRecord::from_session(session))
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::CURRENT_USER)
    }
}

impl ProgressRepository for KvRepository {
    fn get(&self, user_id: &UserId) -> Result<Option<ProgressRecord>, StorageError> {
        let mut all = self.read_all_progress()?;
        Ok(all.remove(user_id).map(ProgressRecordData::into_record))
    }

    fn put(&self, user_id: &UserId, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut all = self.read_all_progress()?;
        all.insert(user_id.clone(), ProgressRecordData::from_record(record));
        self.write_json(keys::USER_PROGRESS, &all)
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    /// Storage over an in-memory key-value store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    /// Storage over JSON files rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `JsonFileStoreError` if the data directory cannot be prepared.
    pub fn json_file(dir: impl Into<PathBuf>) -> Result<Self, JsonFileStoreError> {
        Ok(Self::from_store(Arc::new(JsonFileStore::open(dir)?)))
    }

    /// Storage over any key-value backend.
    #[must_use]
    pub fn from_store(store: Arc<dyn KeyValueStore>) -> Self {
        let repo = KvRepository::new(store);
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            users,
            sessions,
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnhub_core::time::fixed_now;

    fn build_user(email: &str) -> User {
        User::register("Test User", email, "secret1", fixed_now()).unwrap()
    }

    fn repo() -> KvRepository {
        KvRepository::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn users_round_trip_in_registration_order() {
        let repo = repo();
        let first = build_user("first@example.com");
        let second = build_user("second@example.com");
        repo.append(&first).unwrap();
        repo.append(&second).unwrap();

        let listed = repo.list().unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[test]
    fn session_replace_and_clear() {
        let repo = repo();
        assert!(repo.current().unwrap().is_none());

        let user = build_user("ada@example.com");
        let session = Session::for_user(&user, fixed_now());
        repo.replace(&session).unwrap();
        assert_eq!(repo.current().unwrap(), Some(session));

        repo.clear().unwrap();
        assert!(repo.current().unwrap().is_none());
        repo.clear().unwrap();
    }

    #[test]
    fn progress_round_trips_per_user() {
        let repo = repo();
        let user = build_user("ada@example.com");
        assert!(repo.get(user.id()).unwrap().is_none());

        let mut record = ProgressRecord::new(fixed_now());
        record.toggle_lesson(CourseId::new(1), LessonId::new(3));
        repo.put(user.id(), &record).unwrap();

        let fetched = repo.get(user.id()).unwrap().unwrap();
        assert_eq!(fetched, record);

        let other = build_user("other@example.com");
        assert!(repo.get(other.id()).unwrap().is_none());
    }

    #[test]
    fn records_serialize_with_iso_timestamps_and_camel_case() {
        let user = build_user("ada@example.com");
        let raw = serde_json::to_string(&UserRecord::from_user(&user)).unwrap();
        assert!(raw.contains("\"createdAt\":\"2025-06-15T15:06:40Z\""));

        let mut record = ProgressRecord::new(fixed_now());
        record.toggle_lesson(CourseId::new(2), LessonId::new(1));
        let raw = serde_json::to_string(&ProgressRecordData::from_record(&record)).unwrap();
        assert!(raw.contains("\"completedLessons\":[1]"));
        assert!(raw.contains("\"2\""));
    }
}
