//! Repository trait for the durable URL store.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique constraint on `short_code` rejected an insert.
    #[error("short code already exists")]
    Conflict,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Aggregate figures used by the admin tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreSummary {
    pub links: i64,
    pub clicks: i64,
}

/// Durable, unique-keyed storage for [`UrlRecord`]s.
///
/// Implementations own their concurrency safety (connection pooling, locks)
/// and must make [`UrlRepository::increment_clicks`] a single atomic store
/// operation so that concurrent redirects are never lost.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - process-local
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new record and returns it with its store-assigned `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the short code is already taken.
    async fn insert(&self, new_record: NewUrlRecord) -> StoreResult<UrlRecord>;

    /// Finds a record by short code.
    async fn find_by_code(&self, short_code: &str) -> StoreResult<Option<UrlRecord>>;

    /// Checks whether a short code is taken.
    async fn exists(&self, short_code: &str) -> StoreResult<bool>;

    /// Adds one to the click counter of `short_code`.
    ///
    /// Returns `Ok(false)` when no record matched.
    async fn increment_clicks(&self, short_code: &str) -> StoreResult<bool>;

    /// Lists the most recently created records, newest first.
    async fn list_recent(&self, limit: i64) -> StoreResult<Vec<UrlRecord>>;

    /// Counts records and the sum of their clicks.
    async fn summary(&self) -> StoreResult<StoreSummary>;

    /// Round-trips to the store to confirm it is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
