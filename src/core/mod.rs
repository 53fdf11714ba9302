//! Core resilience components
//!
//! Rate limiting, response caching, the shared request/response types and
//! background maintenance tasks.

pub mod cache_manager;
pub mod rate_limiter;
pub mod sweeper;
pub mod types;
