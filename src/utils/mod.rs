//! Helpers shared by the service and the HTTP layer.
//!
//! - [`url_validator`] - absolute URL acceptance check
//! - [`code_generator`] - short code generation and retry policy
//! - [`qr_encoder`] - QR option normalization and PNG data URLs
//! - [`base_url`] - short link base resolution from config or headers
//! - [`db_error`] - Postgres constraint error classification

pub mod base_url;
pub mod code_generator;
pub mod db_error;
pub mod qr_encoder;
pub mod url_validator;
