//! DTOs for URL creation.

use serde::{Deserialize, Serialize};

/// Request to shorten a URL.
///
/// Missing fields fall back to their defaults: an absent URL is rejected by
/// validation, absent or `null` QR options select level `M` at 256 pixels.
#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    #[serde(default)]
    pub original_url: String,

    #[serde(default)]
    pub qr_error_correction: Option<String>,

    #[serde(default)]
    pub qr_size: Option<i64>,
}

/// Response for a freshly created short link.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUrlResponse {
    pub short_code: String,
    pub original_url: String,
    pub short_url: String,
    pub qr_data_url: String,
    pub qr_error_correction: String,
    pub qr_size: u32,
}
