//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, StoreResult, StoreSummary, UrlRepository};
use crate::utils::db_error::is_unique_violation_on_code;

/// PostgreSQL repository for URL records.
///
/// Queries are bound parameters checked at runtime, so the crate builds
/// without a live database.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> StoreResult<UrlRecord> {
        sqlx::query_as::<_, UrlRecord>(
            r#"
            INSERT INTO urls (original_url, short_code, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, original_url, short_code, created_at, expires_at, clicks
            "#,
        )
        .bind(&new_record.original_url)
        .bind(&new_record.short_code)
        .bind(new_record.created_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_code(&e) {
                StoreError::Conflict
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_by_code(&self, short_code: &str) -> StoreResult<Option<UrlRecord>> {
        let record = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, original_url, short_code, created_at, expires_at, clicks
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn exists(&self, short_code: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM urls WHERE short_code = $1)")
                .bind(short_code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn increment_clicks(&self, short_code: &str) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE urls SET clicks = clicks + 1 WHERE short_code = $1")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_recent(&self, limit: i64) -> StoreResult<Vec<UrlRecord>> {
        let records = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, original_url, short_code, created_at, expires_at, clicks
            FROM urls
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }

    async fn summary(&self) -> StoreResult<StoreSummary> {
        let (links, clicks): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*)::BIGINT, COALESCE(SUM(clicks), 0)::BIGINT FROM urls",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(StoreSummary { links, clicks })
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
