//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - PostgreSQL storage for URL records
//! - [`MemoryUrlRepository`] - process-local storage for tests and ephemeral runs

pub mod memory_url_repository;
pub mod pg_url_repository;

pub use memory_url_repository::MemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
