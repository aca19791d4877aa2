//! Unbounded in-memory cache.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use super::service::UrlCache;
use crate::domain::entities::UrlRecord;

/// `HashMap` of short code to record behind a reader-writer lock.
///
/// Lookups take the shared lock, so concurrent redirects do not serialize.
/// Entries are never evicted.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, UrlRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        debug!("Using in-memory URL cache");
        Self::default()
    }
}

impl UrlCache for MemoryCache {
    fn get(&self, short_code: &str) -> Option<UrlRecord> {
        self.entries.read().get(short_code).cloned()
    }

    fn put(&self, short_code: &str, record: UrlRecord) {
        self.entries.write().insert(short_code.to_string(), record);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
