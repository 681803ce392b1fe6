use chrono::{DateTime, Duration, Utc};

/// Time source injected into every service, so tests can pin the clock.
///
/// The default clock follows system time; a fixed clock always reports the
/// instant it was pinned to, until advanced.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    fixed_at: Option<DateTime<Utc>>,
}

impl Clock {
    /// A clock that follows system time.
    #[must_use]
    pub fn system() -> Self {
        Self { fixed_at: None }
    }

    /// A clock pinned at the given instant.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self { fixed_at: Some(at) }
    }

    /// The current time according to this clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_at.unwrap_or_else(Utc::now)
    }

    /// Moves a fixed clock forward. A system clock is unaffected.
    pub fn advance(&mut self, delta: Duration) {
        if let Some(at) = &mut self.fixed_at {
            *at += delta;
        }
    }
}

/// Timestamp used by deterministic tests (2025-06-15T15:06:40Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_750_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` pinned at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
