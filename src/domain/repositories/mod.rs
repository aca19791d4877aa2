//! Repository trait definitions for the domain layer.
//!
//! The store is treated as a black box behind [`UrlRepository`]; concrete
//! implementations live in `crate::infrastructure::persistence`. Mock
//! implementations are generated via `mockall` for unit tests.

pub mod url_repository;

pub use url_repository::{StoreError, StoreResult, StoreSummary, UrlRepository};

#[cfg(test)]
pub use url_repository::MockUrlRepository;
