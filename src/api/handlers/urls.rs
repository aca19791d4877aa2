//! Handlers for URL creation and lookup.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use tracing::debug;

use crate::api::dto::urls::{CreateUrlRequest, CreateUrlResponse};
use crate::domain::entities::UrlRecord;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::short_url;
use crate::utils::qr_encoder::{encode_blocking, normalize_options};

/// Shortens a URL and returns the short link with its QR code.
///
/// # Endpoint
///
/// `POST /api/v1/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com",
///   "qr_error_correction": "H",  // optional, default "M"
///   "qr_size": 512               // optional, default 256
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_code": "aZ3x9Q",
///   "original_url": "https://example.com",
///   "short_url": "http://localhost:8080/aZ3x9Q",
///   "qr_data_url": "data:image/png;base64,...",
///   "qr_error_correction": "H",
///   "qr_size": 512
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an undecodable body, an invalid URL or invalid
/// QR options. Options are checked before anything is stored.
pub async fn create_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), AppError> {
    let Json(payload) = payload.map_err(|e| {
        debug!(error = %e, "Rejected request body");
        AppError::bad_request("invalid request")
    })?;

    let options = normalize_options(
        payload.qr_error_correction.as_deref().unwrap_or(""),
        payload.qr_size.unwrap_or(0),
    )?;

    let record = state.shortener.create(&payload.original_url).await?;

    let short_url = short_url(&state.base_url_for(&headers), &record.short_code);
    let qr = encode_blocking(short_url.clone(), options).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUrlResponse {
            short_code: record.short_code,
            original_url: record.original_url,
            short_url,
            qr_data_url: qr.data_url,
            qr_error_correction: qr.level.to_string(),
            qr_size: qr.size,
        }),
    ))
}

/// Returns the stored record for a short code.
///
/// # Endpoint
///
/// `GET /api/v1/urls/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown.
pub async fn get_url_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<UrlRecord>, AppError> {
    let record = state.shortener.resolve(&code).await?;
    Ok(Json(record))
}
