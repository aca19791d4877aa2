//! DTOs for the QR endpoint.

use serde::{Deserialize, Serialize};

/// Query string of `GET /api/v1/urls/{code}/qr`.
///
/// `size` stays textual so a non-numeric value surfaces as an option error
/// instead of a generic query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct QrQuery {
    pub level: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QrResponse {
    pub short_code: String,
    pub short_url: String,
    pub qr_data_url: String,
    pub qr_error_correction: String,
    pub qr_size: u32,
}
