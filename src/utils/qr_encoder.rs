//! QR option normalization and PNG data URL encoding.

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, imageops};
use qrcode::{EcLevel, QrCode};

use crate::error::AppError;

pub const DEFAULT_QR_SIZE: u32 = 256;
pub const MIN_QR_SIZE: u32 = 128;
pub const MAX_QR_SIZE: u32 = 1024;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Error-correction tier of a QR symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QrLevel {
    /// ~7% recovery
    Low,
    /// ~15% recovery
    #[default]
    Medium,
    /// ~25% recovery
    Quartile,
    /// ~30% recovery
    High,
}

impl QrLevel {
    /// Single-letter name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            QrLevel::Low => "L",
            QrLevel::Medium => "M",
            QrLevel::Quartile => "Q",
            QrLevel::High => "H",
        }
    }

    fn ec_level(self) -> EcLevel {
        match self {
            QrLevel::Low => EcLevel::L,
            QrLevel::Medium => EcLevel::M,
            QrLevel::Quartile => EcLevel::Q,
            QrLevel::High => EcLevel::H,
        }
    }
}

impl fmt::Display for QrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QrLevel {
    type Err = AppError;

    /// Accepts `L`, `M`, `Q` or `H` in any case, surrounded by any whitespace.
    /// Blank input selects [`QrLevel::Medium`].
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "" | "M" => Ok(QrLevel::Medium),
            "L" => Ok(QrLevel::Low),
            "Q" => Ok(QrLevel::Quartile),
            "H" => Ok(QrLevel::High),
            _ => Err(AppError::invalid_option(format!(
                "invalid qr error correction level {raw:?} (use L, M, Q, or H)"
            ))),
        }
    }
}

/// Normalized, validated QR rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    pub level: QrLevel,
    pub size: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            level: QrLevel::Medium,
            size: DEFAULT_QR_SIZE,
        }
    }
}

/// A rendered QR code together with the options that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    pub data_url: String,
    pub level: QrLevel,
    pub size: u32,
}

/// Validates raw client options. A size of `0` selects the default.
pub fn normalize_options(level_raw: &str, size_raw: i64) -> Result<QrOptions, AppError> {
    let level = level_raw.parse::<QrLevel>()?;

    let size = match size_raw {
        0 => DEFAULT_QR_SIZE,
        n if (MIN_QR_SIZE as i64..=MAX_QR_SIZE as i64).contains(&n) => n as u32,
        n => {
            return Err(AppError::invalid_option(format!(
                "invalid qr size {n} (use {MIN_QR_SIZE}-{MAX_QR_SIZE})"
            )));
        }
    };

    Ok(QrOptions { level, size })
}

/// Parses an optional `size` query value. Missing or blank means `0`.
pub fn parse_size(raw: Option<&str>) -> Result<i64, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| AppError::invalid_option(format!("invalid qr size {value:?}"))),
    }
}

/// Renders `content` as a grayscale PNG of `size × size` pixels.
///
/// Modules are scaled by a whole number of pixels and centered on a white
/// canvas, so the symbol stays crisp. When the symbol plus its quiet zone needs
/// more than `size` pixels the canvas grows to fit it at one pixel per module.
pub fn render(content: &str, level: QrLevel, size: u32) -> Result<Vec<u8>, AppError> {
    let code = QrCode::with_error_correction_level(content.as_bytes(), level.ec_level())
        .map_err(|e| AppError::render(e.to_string()))?;

    let natural = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(1, 1)
        .build()
        .width();
    let scale = (size / natural).max(1);

    let symbol = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(scale, scale)
        .build();

    let side = size.max(symbol.width());
    let offset = i64::from((side - symbol.width()) / 2);

    let mut canvas = ImageBuffer::from_pixel(side, side, Luma([255u8]));
    imageops::overlay(&mut canvas, &symbol, offset, offset);

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(canvas)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| AppError::render(e.to_string()))?;

    Ok(bytes)
}

/// Wraps PNG bytes as `data:image/png;base64,...`.
pub fn to_data_url(png: &[u8]) -> String {
    format!("{DATA_URL_PREFIX}{}", STANDARD.encode(png))
}

/// Normalizes raw options, renders `content` and returns the data URL.
pub fn generate_data_url(content: &str, level_raw: &str, size_raw: i64) -> Result<QrImage, AppError> {
    let options = normalize_options(level_raw, size_raw)?;
    encode(content, options)
}

/// Renders with already normalized options.
pub fn encode(content: &str, options: QrOptions) -> Result<QrImage, AppError> {
    let png = render(content, options.level, options.size)?;

    Ok(QrImage {
        data_url: to_data_url(&png),
        level: options.level,
        size: options.size,
    })
}

/// [`encode`] on the blocking thread pool, off the request executor.
pub async fn encode_blocking(content: String, options: QrOptions) -> Result<QrImage, AppError> {
    tokio::task::spawn_blocking(move || encode(&content, options))
        .await
        .map_err(|e| AppError::render(e.to_string()))?
}
