//! Configuration data models
//!
//! This module defines all configuration structures used by the resilience layer.

#![allow(missing_docs)]

pub mod breaker;
pub mod cache;
pub mod gateway;
pub mod pipeline;
pub mod rate_limit;
pub mod security;
pub mod server;

pub use breaker::*;
pub use cache::*;
pub use gateway::*;
pub use pipeline::*;
pub use rate_limit::*;
pub use security::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

/// Default response cache budget in bytes
pub fn default_cache_max_bytes() -> usize {
    50 * 1024 * 1024 // 50MB
}

/// Default cache TTL in seconds
pub fn default_cache_ttl() -> u64 {
    300
}

/// Default interval between expiry sweeps in seconds
pub fn default_sweep_interval() -> u64 {
    60
}

pub fn default_true() -> bool {
    true
}

pub fn default_cors_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

pub fn default_cors_headers() -> Vec<String> {
    [
        "Content-Type",
        "Authorization",
        "X-Requested-With",
        "X-CSRF-Token",
        "X-Request-ID",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect()
}

pub fn default_cors_max_age() -> u32 {
    86400
}
