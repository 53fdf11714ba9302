//! Rate Limiting Implementation
//!
//! Fixed-window request counting per client identity, one limiter per
//! endpoint class.

mod limiter;
mod registry;
mod types;


pub use limiter::RateLimiter;
pub use registry::RateLimiterRegistry;
pub use types::{LimiterInfo, RateLimitResult, RateLimitStatus};
