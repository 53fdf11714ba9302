//! Retry mechanism with exponential backoff

use super::circuit_breaker::CircuitBreaker;
use super::types::RetryConfig;
use crate::utils::error::{ErrorUtils, GatewayError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Result of a retried operation together with how it got there
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: Result<T>,
    /// Attempts actually made, at least one
    pub attempts: u32,
    /// Wall time from the first attempt to the final result
    pub total_time: Duration,
}

impl<T> RetryOutcome<T> {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Drop the bookkeeping and keep the result
    pub fn into_result(self) -> Result<T> {
        self.result
    }
}

/// Retry mechanism with exponential backoff
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Policy for critical operations, see [`RetryConfig::critical`]
    pub fn critical() -> Self {
        Self::new(RetryConfig::critical())
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run `f` until it succeeds, the error is not retryable or attempts run out.
    ///
    /// Retryability is decided by [`ErrorUtils::is_retryable`].
    pub async fn run<F, Fut, T>(&self, f: F) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run_with(f, ErrorUtils::is_retryable).await
    }

    /// Like [`RetryPolicy::run`] with a caller-supplied retry predicate
    pub async fn run_with<F, Fut, T, P>(&self, mut f: F, should_retry: P) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        P: Fn(&GatewayError) -> bool,
    {
        let started = Instant::now();
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match f().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Retry succeeded on attempt {}", attempt);
                    }
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt,
                        total_time: started.elapsed(),
                    };
                }
                Err(error) => {
                    if attempt >= max_attempts || !should_retry(&error) {
                        if attempt > 1 {
                            warn!("Giving up after {} attempts: {}", attempt, error);
                        }
                        return RetryOutcome {
                            result: Err(error),
                            attempts: attempt,
                            total_time: started.elapsed(),
                        };
                    }

                    let delay = self.config.delay_for(attempt);
                    debug!(
                        "Attempt {} failed: {}, retrying in {:?}",
                        attempt, error, delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Convenience wrapper returning only the result
    pub async fn call<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run(f).await.result
    }

    /// Retry where every attempt goes through `breaker`.
    ///
    /// An open circuit surfaces as [`GatewayError::CircuitOpen`], which the
    /// default predicate does not retry.
    pub async fn run_guarded<F, Fut, T>(
        &self,
        breaker: &CircuitBreaker,
        mut f: F,
    ) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run(|| breaker.execute(f())).await
    }
}
