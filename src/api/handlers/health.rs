//! `GET /health`: store, click queue and cache status.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Probes every component and reports the result.
///
/// Answers `200` when all checks pass and `503` otherwise, with the same body
/// in both cases:
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Connected" },
///     "click_queue": { "status": "ok", "message": "Free slots: 10000" },
///     "cache": { "status": "ok", "message": "memory, 42 entries" }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let checks = HealthChecks {
        store: store_status(&state).await,
        click_queue: click_queue_status(&state),
        cache: cache_status(&state),
    };

    let response = HealthResponse::new(checks, env!("CARGO_PKG_VERSION"));
    let code = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}

async fn store_status(state: &AppState) -> CheckStatus {
    if let Err(e) = state.shortener.check_store().await {
        tracing::warn!(error = %e, "Store health check failed");
        return CheckStatus::error("Store unreachable");
    }

    CheckStatus::ok("Connected")
}

fn click_queue_status(state: &AppState) -> CheckStatus {
    let recorder = state.shortener.clicks();

    match recorder.is_closed() {
        true => CheckStatus::error("Click queue is closed"),
        false => CheckStatus::ok(format!("Free slots: {}", recorder.capacity())),
    }
}

fn cache_status(state: &AppState) -> CheckStatus {
    let cache = state.shortener.cache();
    CheckStatus::ok(format!("{}, {} entries", cache.backend(), cache.len()))
}
