//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (cache first, store on a miss)
/// 2. Queue a click for the background worker
/// 3. Return 301 Moved Permanently
///
/// # Click Tracking
///
/// The click is handed to a bounded channel and applied later. A full queue
/// drops the click; the redirect is served regardless.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.shortener.resolve(&code).await?;

    state.shortener.record_click(&code);

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, record.original_url)],
    ))
}
