//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`            - Landing page
//! - `GET  /health`      - Health check: store, click queue, cache
//! - `/api/v1/*`         - JSON API
//! - `GET  /{code}`      - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Configured origin policy
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, home_handler, redirect_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and middleware without path normalization.
///
/// `cors_origins` is the allowed origin list; empty or `*` allows any origin.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api::routes::api_routes())
        .route("/{code}", get(redirect_handler))
        .with_state(state)
        .layer(cors::layer(cors_origins))
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/abc123/` redirects like
/// `/abc123`.
pub fn app_router(state: AppState, cors_origins: &[String]) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, cors_origins))
}
