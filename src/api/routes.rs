//! API route configuration.

use crate::api::handlers::{create_url_handler, get_url_handler, qr_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Versioned JSON API, mounted under `/api/v1`.
///
/// # Endpoints
///
/// - `POST /urls`             - Shorten a URL, returns the link and its QR code
/// - `GET  /urls/{code}`      - Stored record for a short code
/// - `GET  /urls/{code}/qr`   - QR code for a short code (`level`, `size` query)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(create_url_handler))
        .route("/urls/{code}", get(get_url_handler))
        .route("/urls/{code}/qr", get(qr_handler))
}
