//! Error recovery and resilience utilities
//!
//! Backoff, retries, circuit breakers and timeout protection for outbound
//! dependencies.

mod backoff;
mod circuit_breaker;
mod fetch;
mod resilience;
mod retry;
mod types;

pub use backoff::{backoff_delay, with_jitter};
pub use circuit_breaker::CircuitBreaker;
pub use fetch::{FetchOptions, fetch_with_breaker, fetch_with_retry};
pub use resilience::{CircuitBreakers, TimeoutWrapper};
pub use retry::{RetryOutcome, RetryPolicy};
pub use types::{CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState, MAX_JITTER, RetryConfig};
