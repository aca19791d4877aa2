//! No-op cache for disabled caching.

use super::service::UrlCache;
use crate::domain::entities::UrlRecord;
use tracing::debug;

/// A cache that stores nothing.
///
/// Selected with `CACHE_ENABLED=false`. Every lookup misses, so every resolve
/// goes to the store.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlCache for NullCache {
    fn get(&self, _short_code: &str) -> Option<UrlRecord> {
        None
    }

    fn put(&self, _short_code: &str, _record: UrlRecord) {}

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}
