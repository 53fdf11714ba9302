//! In-memory response caching
//!
//! Successful JSON GET responses are kept under a byte budget with per-entry
//! TTLs and oldest-first eviction.

pub mod manager;
pub mod types;


pub use manager::ResponseCache;
pub use types::{CacheKey, CacheStats};
