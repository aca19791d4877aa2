//! Shared application state injected into every handler.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::application::services::ShortenerService;
use crate::utils::base_url::resolve_base_url;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    /// Public base for short links. When unset it is derived per request.
    pub base_url: Option<Arc<str>>,
}

impl AppState {
    pub fn new(shortener: Arc<ShortenerService>, base_url: Option<String>) -> Self {
        Self {
            shortener,
            base_url: base_url.map(Arc::from),
        }
    }

    /// Base URL for links returned in response to `headers`.
    pub fn base_url_for(&self, headers: &HeaderMap) -> String {
        resolve_base_url(self.base_url.as_deref(), headers)
    }
}
