//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits and provide a clean API for
//! HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - short link creation, resolution and click capture

pub mod services;
