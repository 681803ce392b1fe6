use chrono::{DateTime, Utc};

use crate::model::ids::UserId;
use crate::model::user::User;

/// The record identifying the currently authenticated user on this client.
///
/// Derived from a [`User`] at login; at most one session is active at a time
/// and it carries only public account fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    name: String,
    email: String,
    login_time: DateTime<Utc>,
}

impl Session {
    /// Opens a session for the given user, stamped with the login time.
    #[must_use]
    pub fn for_user(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id().clone(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            login_time: now,
        }
    }

    /// Rehydrates a session from persisted storage.
    #[must_use]
    pub fn from_persisted(
        user_id: UserId,
        name: String,
        email: String,
        login_time: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            name,
            email,
            login_time,
        }
    }

    // Accessors
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
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
    pub fn login_time(&self) -> DateTime<Utc> {
        self.login_time
    }
}
