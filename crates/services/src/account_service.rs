use std::sync::Arc;

use learnhub_core::model::{ProgressRecord, Session, User, UserProfile, ValidationError};
use storage::repository::{ProgressRepository, SessionRepository, UserRepository};

use crate::Clock;
use crate::error::AccountError;

/// Identity lifecycle and the single active session.
///
/// Registration appends to the persisted user list; login replaces whatever
/// session exists. Duplicate-email and credential checks are case-insensitive
/// on email only, password comparison is exact.
#[derive(Clone)]
pub struct AccountService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl AccountService {
    #[must_use]
    pub fn new(
        clock: Clock,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            users,
            sessions,
            progress,
        }
    }

    /// Registers a new account and initializes its empty progress record.
    ///
    /// Returns the created account's public fields, never the password.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` for empty fields or a short
    /// password, `AccountError::DuplicateEmail` when another account already
    /// uses the email (any case variant), `AccountError::Storage` if
    /// persistence fails.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AccountError> {
        let now = self.clock.now();
        let user = User::register(name, email, password, now)?;

        let existing = self.users.list()?;
        if existing.iter().any(|u| u.email_matches(user.email())) {
            return Err(AccountError::DuplicateEmail);
        }

        self.users.append(&user)?;
        if self.progress.get(user.id())?.is_none() {
            self.progress.put(user.id(), &ProgressRecord::new(now))?;
        }

        Ok(user.profile())
    }

    /// Logs in, replacing any existing session with a fresh login time.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` when either field is empty,
    /// `AccountError::InvalidCredentials` when no stored account matches,
    /// `AccountError::Storage` if persistence fails.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, AccountError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }

        let users = self.users.list()?;
        let user = users
            .iter()
            .find(|u| u.credentials_match(email, password))
            .ok_or(AccountError::InvalidCredentials)?;

        let session = Session::for_user(user, self.clock.now());
        self.sessions.replace(&session)?;
        Ok(session)
    }

    /// Clears the session unconditionally. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the session cannot be removed.
    pub fn logout(&self) -> Result<(), AccountError> {
        self.sessions.clear()?;
        Ok(())
    }

    /// The active session, if anyone is logged in. Pure read.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the session cannot be loaded.
    pub fn current_user(&self) -> Result<Option<Session>, AccountError> {
        Ok(self.sessions.current()?)
    }

    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the session cannot be loaded.
    pub fn is_logged_in(&self) -> Result<bool, AccountError> {
        Ok(self.current_user()?.is_some())
    }
}
