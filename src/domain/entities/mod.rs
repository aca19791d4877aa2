//! Core domain entities.
//!
//! - [`UrlRecord`] - a committed short code → URL mapping
//! - [`NewUrlRecord`] - the payload used to insert one

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};
