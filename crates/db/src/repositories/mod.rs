//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every mutating method runs in one database transaction and locks the rows
//! it reads with `SELECT ... FOR UPDATE` before writing.

pub mod account;
pub mod entry;
pub mod ledger;
pub mod notice;
pub mod otp;
pub mod workflow;

pub use account::AccountRepository;
pub use entry::EntryRepository;
pub use ledger::{AllocationResult, LedgerRepository};
pub use notice::NoticeRepository;
pub use otp::OtpRepository;
pub use workflow::{FinalizedEntry, RecordedOtp, SubmittedEntry, WorkflowRepository};

use chrono::Utc;
use chrono_tz::Tz;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DatabaseTransaction, DbErr, SqlErr};
use tracing::warn;

/// Source of `updated_at` stamps in the configured time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    tz: Tz,
}

impl Clock {
    /// Creates a clock for the given zone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Current time in the configured zone.
    #[must_use]
    pub fn now(&self) -> DateTimeWithTimeZone {
        Utc::now().with_timezone(&self.tz).fixed_offset()
    }

    /// The configured zone.
    #[must_use]
    pub const fn tz(&self) -> Tz {
        self.tz
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Kolkata)
    }
}

/// Returns the violated constraint message if `err` is a unique violation.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}

/// Commits on success; rolls back explicitly on failure.
pub(crate) async fn settle<T, E>(
    txn: DatabaseTransaction,
    result: Result<T, E>,
    db_err: fn(DbErr) -> E,
) -> Result<T, E> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(db_err)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = txn.rollback().await {
                warn!(error = %rollback, "Rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_uses_configured_zone() {
        let clock = Clock::default();
        assert_eq!(clock.tz(), chrono_tz::Asia::Kolkata);
        // IST is UTC+05:30 with no daylight saving.
        assert_eq!(clock.now().offset().local_minus_utc(), 5 * 3600 + 30 * 60);

        let utc = Clock::new(chrono_tz::UTC);
        assert_eq!(utc.now().offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_unique_violation_ignores_other_errors() {
        assert!(unique_violation(&DbErr::Custom("boom".to_string())).is_none());
    }
}
