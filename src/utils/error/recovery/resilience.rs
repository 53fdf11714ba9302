//! Timeout protection and the per-dependency breaker set

use super::circuit_breaker::CircuitBreaker;
use super::types::{CircuitBreakerConfig, CircuitBreakerMetrics};
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Timeout wrapper for async operations.
///
/// When the deadline wins the wrapped future is dropped, cancelling it at its
/// next suspension point.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutWrapper {
    timeout: Duration,
}

impl TimeoutWrapper {
    /// Create a new timeout wrapper
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn duration(&self) -> Duration {
        self.timeout
    }

    /// Execute a future with timeout protection
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: std::future::Future<Output = R>,
    {
        match tokio::time::timeout(self.timeout, f).await {
            Ok(result) => Ok(result),
            Err(_) => Err(GatewayError::Timeout(format!(
                "Operation timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

/// Independent breakers for each class of outbound dependency
#[derive(Debug, Clone)]
pub struct CircuitBreakers {
    pub database: Arc<CircuitBreaker>,
    pub email: Arc<CircuitBreaker>,
    pub external: Arc<CircuitBreaker>,
}

impl CircuitBreakers {
    pub fn new(
        database: CircuitBreakerConfig,
        email: CircuitBreakerConfig,
        external: CircuitBreakerConfig,
    ) -> Self {
        Self {
            database: Arc::new(CircuitBreaker::new(database)),
            email: Arc::new(CircuitBreaker::new(email)),
            external: Arc::new(CircuitBreaker::new(external)),
        }
    }

    /// Iterate over every breaker in a stable order
    pub fn all(&self) -> [&Arc<CircuitBreaker>; 3] {
        [&self.database, &self.email, &self.external]
    }

    /// Look a breaker up by its configured name
    pub fn get(&self, name: &str) -> Option<&Arc<CircuitBreaker>> {
        self.all().into_iter().find(|b| b.name() == name)
    }

    pub fn metrics(&self) -> Vec<CircuitBreakerMetrics> {
        self.all().iter().map(|b| b.metrics()).collect()
    }

    pub fn reset_all(&self) {
        for breaker in self.all() {
            breaker.reset();
        }
    }
}

impl Default for CircuitBreakers {
    fn default() -> Self {
        Self::new(
            CircuitBreakerConfig::new("database", 5, Duration::from_secs(60)),
            CircuitBreakerConfig::new("email", 3, Duration::from_secs(30)),
            CircuitBreakerConfig::new("external", 5, Duration::from_secs(60)),
        )
    }
}
