//! Circuit breaker implementation

use super::types::{CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState};
use crate::utils::error::{GatewayError, Result};
use parking_lot::Mutex;
use std::future::Future;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    last_failure_at: Option<Instant>,
    probe_in_flight: bool,
    rejected_count: u64,
}

impl BreakerState {
    fn closed() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            last_failure_at: None,
            probe_in_flight: false,
            rejected_count: 0,
        }
    }
}

/// Circuit breaker guarding one downstream dependency.
///
/// State transitions happen under a single lock so concurrent callers never
/// observe a half-applied change. The OPEN to HALF_OPEN move is lazy: it is
/// taken by the first call that arrives after `reset_timeout` has elapsed,
/// and that call becomes the only probe.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerState>,
}

/// Clears the probe flag if a probe future is dropped before finishing
struct ProbeGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut inner = self.breaker.inner.lock();
            inner.probe_in_flight = false;
            debug!(
                "Circuit breaker '{}' probe cancelled",
                self.breaker.config.name
            );
        }
    }
}

impl CircuitBreaker {
    /// Create a new circuit breaker
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(BreakerState::closed()),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Run `operation` through the breaker.
    ///
    /// While open the operation is not polled and
    /// [`GatewayError::CircuitOpen`] is returned. Errors from the operation
    /// are returned unchanged after being counted.
    pub async fn execute<Fut, T>(&self, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let is_probe = self.admit()?;
        let mut guard = ProbeGuard {
            breaker: self,
            armed: is_probe,
        };

        let result = operation.await;
        guard.armed = false;

        match &result {
            Ok(_) => self.on_success(),
            Err(error) => self.on_failure(error),
        }
        result
    }

    /// Decide whether a call may proceed; `Ok(true)` marks the probe
    fn admit(&self) -> Result<bool> {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => Ok(false),
            CircuitState::Open => {
                let elapsed_enough = inner
                    .last_failure_at
                    .is_none_or(|at| at.elapsed() > self.config.reset_timeout);
                if elapsed_enough {
                    info!(
                        "Circuit breaker '{}' transitioning to HALF_OPEN",
                        self.config.name
                    );
                    inner.state = CircuitState::HalfOpen;
                    inner.probe_in_flight = true;
                    Ok(true)
                } else {
                    inner.rejected_count += 1;
                    Err(GatewayError::CircuitOpen(self.config.name.clone()))
                }
            }
            CircuitState::HalfOpen => {
                if inner.probe_in_flight {
                    inner.rejected_count += 1;
                    Err(GatewayError::CircuitOpen(self.config.name.clone()))
                } else {
                    inner.probe_in_flight = true;
                    Ok(true)
                }
            }
        }
    }

    fn on_success(&self) {
        let mut inner = self.inner.lock();
        if inner.state != CircuitState::Closed {
            info!("Circuit breaker '{}' closed", self.config.name);
        }
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.probe_in_flight = false;
    }

    fn on_failure(&self, error: &GatewayError) {
        let mut inner = self.inner.lock();
        inner.failure_count = inner.failure_count.saturating_add(1);
        inner.last_failure_at = Some(Instant::now());

        match inner.state {
            CircuitState::HalfOpen => {
                warn!(
                    "Circuit breaker '{}' probe failed, reopening: {}",
                    self.config.name, error
                );
                inner.state = CircuitState::Open;
                inner.probe_in_flight = false;
            }
            CircuitState::Closed if inner.failure_count >= self.config.failure_threshold => {
                warn!(
                    "Circuit breaker '{}' opened after {} failures: {}",
                    self.config.name, inner.failure_count, error
                );
                inner.state = CircuitState::Open;
            }
            _ => {
                debug!(
                    "Circuit breaker '{}' recorded failure {}/{}",
                    self.config.name, inner.failure_count, self.config.failure_threshold
                );
            }
        }
    }

    /// Get current state
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    /// Get circuit breaker metrics
    pub fn metrics(&self) -> CircuitBreakerMetrics {
        let inner = self.inner.lock();
        CircuitBreakerMetrics {
            name: self.config.name.clone(),
            state: inner.state,
            failure_count: inner.failure_count,
            last_failure_ms_ago: inner
                .last_failure_at
                .map(|at| at.elapsed().as_millis() as u64),
            rejected_count: inner.rejected_count,
        }
    }

    /// Force the breaker back to CLOSED with cleared counters
    pub fn reset(&self) {
        *self.inner.lock() = BreakerState::closed();
        info!("Circuit breaker '{}' reset", self.config.name);
    }
}
