//! Repository trait for short URL data access.

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for the `urls` table.
///
/// Implementations must enforce short code uniqueness at insert time; that
/// constraint is the only correctness guarantee against duplicate codes.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new short URL and returns the stored record with its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AlreadyExists`] if the short code is taken.
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on database errors.
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Finds a record by short code, regardless of expiry.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Cheap existence probe used before inserting a generated code.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically increments `access_count` and sets `last_accessed`.
    ///
    /// Returns `Ok(false)` if the row no longer exists.
    async fn record_access(&self, id: i64, at: DateTime<Utc>) -> Result<bool, AppError>;

    /// Deletes a record by short code.
    ///
    /// Returns `Ok(true)` if a row was removed.
    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Deletes every record with `expires_at` strictly before `now` in a
    /// single statement and returns the number of removed rows.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Lists records newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ShortUrl>, AppError>;

    /// Counts all records.
    async fn count(&self) -> Result<i64, AppError>;

    /// Round-trips a trivial statement to check connectivity.
    async fn ping(&self) -> Result<(), AppError>;
}
