//! Shortened URL entity.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A shortened URL as committed to the store.
///
/// `clicks` is only authoritative when read straight from the store; copies
/// held by the cache keep whatever value they had when they were populated.
/// `expires_at` is persisted but not enforced anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub clicks: i64,
}

/// Input data for inserting a new record. The store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
}

impl NewUrlRecord {
    /// Builds an insert payload stamped with the current UTC time.
    ///
    /// The timestamp is truncated to microseconds, the precision Postgres keeps,
    /// so the value handed back by the store equals the one that was sent.
    pub fn new(original_url: impl Into<String>, short_code: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            short_code: short_code.into(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Materializes the committed record once the store has assigned an id.
    pub fn into_record(self, id: i64) -> UrlRecord {
        UrlRecord {
            id,
            original_url: self.original_url,
            short_code: self.short_code,
            created_at: self.created_at,
            expires_at: None,
            clicks: 0,
        }
    }
}
