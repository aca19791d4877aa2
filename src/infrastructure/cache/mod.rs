//! Caching layer for fast redirect lookups.
//!
//! Provides a [`UrlCache`] trait with two implementations:
//! - [`MemoryCache`] - process-local map, the default
//! - [`NullCache`] - no-op implementation for disabled caching

mod memory_cache;
mod null_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
#[cfg(test)]
pub use service::MockUrlCache;
pub use service::UrlCache;
