use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::UserId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("all fields are required")]
    MissingFields,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,

    #[error("email and password are required")]
    MissingCredentials,
}

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

//
// ─── USER ──────────────────────────────────────────────────────────────────────
//

/// A registered account.
///
/// Emails are normalized to lowercase at registration and act as the
/// case-insensitive unique key. The password is kept exactly as entered;
/// nothing here hashes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user from registration input.
    ///
    /// Trims the name, trims and lowercases the email, and stamps the
    /// creation time. A fresh id is generated from `now`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingFields` if any field is empty or
    /// whitespace-only, `ValidationError::PasswordTooShort` if the password
    /// has fewer than [`MIN_PASSWORD_LEN`] characters.
    pub fn register(
        name: &str,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        let email = email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }

        Ok(Self {
            id: UserId::generate(now),
            name: name.to_owned(),
            email,
            password: password.to_owned(),
            created_at: now,
        })
    }

    /// Rehydrates a user from persisted storage without re-validation.
    #[must_use]
    pub fn from_persisted(
        id: UserId,
        name: String,
        email: String,
        password: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password,
            created_at,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Case-insensitive email comparison against raw caller input.
    #[must_use]
    pub fn email_matches(&self, candidate: &str) -> bool {
        self.email == candidate.trim().to_lowercase()
    }

    /// Login check: case-insensitive email, exact password.
    #[must_use]
    pub fn credentials_match(&self, email: &str, password: &str) -> bool {
        self.email_matches(email) && self.password == password
    }

    /// Public view of the account. Never includes the password.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public account fields, safe to hand to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
