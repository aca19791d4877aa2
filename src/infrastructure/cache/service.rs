//! Cache trait for resolved URL records.

use crate::domain::entities::UrlRecord;

/// In-process lookup structure in front of the durable store.
///
/// Entries are snapshots of committed store state. They are written after an
/// insert or a read-miss and never invalidated, so only `clicks` may lag
/// behind the store.
///
/// Implementations are synchronous and must never be held across `.await`.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MemoryCache`] - unbounded map behind a reader-writer lock
/// - [`crate::infrastructure::cache::NullCache`] - always misses, for disabled caching
#[cfg_attr(test, mockall::automock)]
pub trait UrlCache: Send + Sync {
    /// Returns a copy of the cached record, if any.
    fn get(&self, short_code: &str) -> Option<UrlRecord>;

    /// Stores `record` under `short_code`, replacing any previous entry.
    fn put(&self, short_code: &str, record: UrlRecord);

    /// Drops every entry.
    fn clear(&self);

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
