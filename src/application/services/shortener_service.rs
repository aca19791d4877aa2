//! Short link creation and resolution service.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::click_event::ClickRecorder;
use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::error::AppError;
use crate::infrastructure::cache::UrlCache;
use crate::utils::code_generator::{AttemptError, CodeGenerator};
use crate::utils::url_validator::is_shortenable;

/// Service for creating and resolving short links.
///
/// The store is authoritative. The cache is written only after a successful
/// insert or a store read, so it never holds a record the store does not.
pub struct ShortenerService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn UrlCache>,
    generator: CodeGenerator,
    clicks: ClickRecorder,
}

impl ShortenerService {
    /// Creates the service and empties `cache`.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn UrlCache>,
        generator: CodeGenerator,
        clicks: ClickRecorder,
    ) -> Self {
        cache.clear();

        Self {
            repository,
            cache,
            generator,
            clicks,
        }
    }

    /// Shortens `original_url` under a freshly generated code.
    ///
    /// # Code Generation
    ///
    /// Each attempt draws a code, probes the store, then inserts. A probe hit
    /// and a unique-constraint rejection on insert both count against the same
    /// retry budget.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the URL is not absolute with a host
    /// - [`AppError::GenerationExhausted`] if every attempt collided
    /// - [`AppError::StoreFailure`] if the store failed
    pub async fn create(&self, original_url: &str) -> Result<UrlRecord, AppError> {
        if !is_shortenable(original_url) {
            return Err(AppError::InvalidUrl);
        }

        let record = self
            .generator
            .retry(|| self.try_insert(original_url))
            .await?;

        self.cache.put(&record.short_code, record.clone());

        info!(
            code = %record.short_code,
            url = %record.original_url,
            "Short link created"
        );

        Ok(record)
    }

    async fn try_insert(&self, original_url: &str) -> Result<UrlRecord, AttemptError> {
        let code = self.generator.probe(self.repository.as_ref()).await?;

        match self
            .repository
            .insert(NewUrlRecord::new(original_url, code))
            .await
        {
            Ok(record) => Ok(record),
            Err(StoreError::Conflict) => {
                debug!("Short code taken between probe and insert");
                Err(AttemptError::Collision)
            }
            Err(e) => Err(AttemptError::Store(e)),
        }
    }

    /// Looks up a short code, cache first.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is unknown
    /// - [`AppError::StoreFailure`] if the store failed on a cache miss
    pub async fn resolve(&self, short_code: &str) -> Result<UrlRecord, AppError> {
        if let Some(record) = self.cache.get(short_code) {
            debug!(code = %short_code, "Cache hit");
            return Ok(record);
        }

        let record = self
            .repository
            .find_by_code(short_code)
            .await?
            .ok_or(AppError::NotFound)?;

        self.cache.put(short_code, record.clone());

        Ok(record)
    }

    /// Counts a visit to `short_code` without waiting for the store.
    ///
    /// Returns `false` if the click was dropped.
    pub fn record_click(&self, short_code: &str) -> bool {
        self.clicks.record(short_code)
    }

    /// Confirms the store answers.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.repository.ping().await?;
        Ok(())
    }

    pub fn cache(&self) -> &dyn UrlCache {
        self.cache.as_ref()
    }

    pub fn clicks(&self) -> &ClickRecorder {
        &self.clicks
    }
}
