//! Handler for QR codes of existing short links.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};

use crate::api::dto::qr::{QrQuery, QrResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::short_url;
use crate::utils::qr_encoder::{encode_blocking, normalize_options, parse_size};

/// Renders the QR code of an existing short link.
///
/// # Endpoint
///
/// `GET /api/v1/urls/{code}/qr?level=Q&size=512`
///
/// Both query parameters are optional; see [`normalize_options`] for defaults
/// and bounds.
///
/// # Errors
///
/// - 404 Not Found if the code is unknown
/// - 400 Bad Request for an unknown level or a size that is not an integer
///   in range
pub async fn qr_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<QrQuery>,
    headers: HeaderMap,
) -> Result<Json<QrResponse>, AppError> {
    let record = state.shortener.resolve(&code).await?;

    let size = parse_size(query.size.as_deref())?;
    let options = normalize_options(query.level.as_deref().unwrap_or(""), size)?;

    let short_url = short_url(&state.base_url_for(&headers), &record.short_code);
    let qr = encode_blocking(short_url.clone(), options).await?;

    Ok(Json(QrResponse {
        short_code: record.short_code,
        short_url,
        qr_data_url: qr.data_url,
        qr_error_correction: qr.level.to_string(),
        qr_size: qr.size,
    }))
}
