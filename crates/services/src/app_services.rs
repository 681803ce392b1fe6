use std::path::Path;
use std::sync::Arc;

use learnhub_core::Catalog;
use storage::repository::{Storage, UserRepository};

use crate::Clock;
use crate::account_service::AccountService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

const DEMO_NAME: &str = "Demo User";
const DEMO_EMAIL: &str = "demo@learnhub.com";
const DEMO_PASSWORD: &str = "demo123";

/// Assembles app-facing services over a shared storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    users: Arc<dyn UserRepository>,
    accounts: Arc<AccountService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Builds services over the given storage, sharing one seeded catalog.
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock) -> Self {
        let catalog = Arc::new(Catalog::seeded());
        let accounts = Arc::new(AccountService::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.progress),
        ));
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.progress),
        ));

        Self {
            catalog,
            users: Arc::clone(&storage.users),
            accounts,
            progress,
        }
    }

    /// Build services backed by in-memory storage.
    #[must_use]
    pub fn new_in_memory(clock: Clock) -> Self {
        Self::new(&Storage::in_memory(), clock)
    }

    /// Build services backed by JSON files under `dir`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the data directory cannot be prepared.
    pub fn new_json_file(dir: impl AsRef<Path>, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::json_file(dir.as_ref())?;
        Ok(Self::new(&storage, clock))
    }

    /// Creates the demo account when no users exist yet.
    ///
    /// Called explicitly by the presentation layer at startup, not as a
    /// construction side effect. Returns `true` when the account was created
    /// by this call.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the user list cannot be read or the
    /// demo registration fails.
    pub fn ensure_demo_user(&self) -> Result<bool, AppServicesError> {
        if !self.users.list()?.is_empty() {
            return Ok(false);
        }

        self.accounts
            .register(DEMO_NAME, DEMO_EMAIL, DEMO_PASSWORD)?;
        Ok(true)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
