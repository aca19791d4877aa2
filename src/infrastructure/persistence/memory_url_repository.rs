//! Process-local implementation of the URL repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, StoreResult, StoreSummary, UrlRepository};

#[derive(Default)]
struct Table {
    rows: HashMap<String, UrlRecord>,
    last_id: i64,
}

/// Repository holding records in a map keyed by short code.
///
/// Ids are assigned sequentially from 1, mirroring a `BIGSERIAL` column.
/// Used by `STORE_BACKEND=memory` and by tests. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryUrlRepository {
    table: RwLock<Table>,
    unavailable: AtomicBool,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail as if the store were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> StoreResult<UrlRecord> {
        self.check_available()?;

        let mut table = self.table.write();
        if table.rows.contains_key(&new_record.short_code) {
            return Err(StoreError::Conflict);
        }

        table.last_id += 1;
        let record = new_record.into_record(table.last_id);
        table.rows.insert(record.short_code.clone(), record.clone());

        Ok(record)
    }

    async fn find_by_code(&self, short_code: &str) -> StoreResult<Option<UrlRecord>> {
        self.check_available()?;
        Ok(self.table.read().rows.get(short_code).cloned())
    }

    async fn exists(&self, short_code: &str) -> StoreResult<bool> {
        self.check_available()?;
        Ok(self.table.read().rows.contains_key(short_code))
    }

    async fn increment_clicks(&self, short_code: &str) -> StoreResult<bool> {
        self.check_available()?;

        match self.table.write().rows.get_mut(short_code) {
            Some(record) => {
                record.clicks += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_recent(&self, limit: i64) -> StoreResult<Vec<UrlRecord>> {
        self.check_available()?;

        let mut records: Vec<UrlRecord> = self.table.read().rows.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));

        Ok(records)
    }

    async fn summary(&self) -> StoreResult<StoreSummary> {
        self.check_available()?;

        let table = self.table.read();
        Ok(StoreSummary {
            links: table.rows.len() as i64,
            clicks: table.rows.values().map(|r| r.clicks).sum(),
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = MemoryUrlRepository::new();

        let a = repo.insert(NewUrlRecord::new("https://a.example", "aaaaaa")).await.unwrap();
        let b = repo.insert(NewUrlRecord::new("https://b.example", "bbbbbb")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.clicks, 0);
    }

    #[tokio::test]
    async fn test_insert_duplicate_code_conflicts() {
        let repo = MemoryUrlRepository::new();
        repo.insert(NewUrlRecord::new("https://a.example", "abc123")).await.unwrap();

        let result = repo.insert(NewUrlRecord::new("https://b.example", "abc123")).await;

        assert!(matches!(result, Err(StoreError::Conflict)));
        assert_eq!(
            repo.find_by_code("abc123").await.unwrap().unwrap().original_url,
            "https://a.example"
        );
    }

    #[tokio::test]
    async fn test_find_and_exists() {
        let repo = MemoryUrlRepository::new();
        let inserted = repo.insert(NewUrlRecord::new("https://a.example", "abc123")).await.unwrap();

        assert_eq!(repo.find_by_code("abc123").await.unwrap(), Some(inserted));
        assert!(repo.exists("abc123").await.unwrap());
        assert!(!repo.exists("zzzzzz").await.unwrap());
        assert!(repo.find_by_code("zzzzzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_clicks() {
        let repo = MemoryUrlRepository::new();
        repo.insert(NewUrlRecord::new("https://a.example", "abc123")).await.unwrap();

        assert!(repo.increment_clicks("abc123").await.unwrap());
        assert!(repo.increment_clicks("abc123").await.unwrap());
        assert!(!repo.increment_clicks("zzzzzz").await.unwrap());

        assert_eq!(repo.find_by_code("abc123").await.unwrap().unwrap().clicks, 2);
    }

    #[tokio::test]
    async fn test_list_recent_and_summary() {
        let repo = MemoryUrlRepository::new();
        for code in ["aaaaaa", "bbbbbb", "cccccc"] {
            repo.insert(NewUrlRecord::new("https://example.com", code)).await.unwrap();
        }
        repo.increment_clicks("bbbbbb").await.unwrap();

        let recent = repo.list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].short_code, "cccccc");

        let summary = repo.summary().await.unwrap();
        assert_eq!(summary, StoreSummary { links: 3, clicks: 1 });
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let repo = MemoryUrlRepository::new();
        repo.set_unavailable(true);

        assert!(matches!(repo.ping().await, Err(StoreError::Database(_))));
        assert!(repo.exists("abc123").await.is_err());

        repo.set_unavailable(false);
        assert!(repo.ping().await.is_ok());
    }
}
