//! Outbound HTTP with per-attempt timeouts and retries

use super::circuit_breaker::CircuitBreaker;
use super::retry::{RetryOutcome, RetryPolicy};
use super::types::RetryConfig;
use crate::utils::error::{GatewayError, Result};
use std::time::Duration;
use tracing::debug;

/// Options for [`fetch_with_retry`]
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub retry: RetryConfig,
    /// Deadline for each individual attempt
    pub attempt_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

/// Send `request`, retrying transient failures.
///
/// Each attempt is cancelled after `attempt_timeout`. 4xx responses become
/// [`GatewayError::Client`] and are never retried; 5xx responses and
/// connection failures go through the normal retry predicate. The request
/// body must be cloneable (no streaming bodies).
pub async fn fetch_with_retry(
    client: &reqwest::Client,
    request: reqwest::Request,
    options: &FetchOptions,
) -> RetryOutcome<reqwest::Response> {
    let policy = RetryPolicy::new(options.retry.clone());
    policy
        .run(|| send_once(client, &request, options.attempt_timeout))
        .await
}

/// [`fetch_with_retry`] with every attempt gated by `breaker`
pub async fn fetch_with_breaker(
    client: &reqwest::Client,
    breaker: &CircuitBreaker,
    request: reqwest::Request,
    options: &FetchOptions,
) -> RetryOutcome<reqwest::Response> {
    let policy = RetryPolicy::new(options.retry.clone());
    policy
        .run_guarded(breaker, || {
            send_once(client, &request, options.attempt_timeout)
        })
        .await
}

async fn send_once(
    client: &reqwest::Client,
    request: &reqwest::Request,
    timeout: Duration,
) -> Result<reqwest::Response> {
    let attempt = request
        .try_clone()
        .ok_or_else(|| GatewayError::internal("request body cannot be replayed"))?;
    debug!("Sending {} {}", attempt.method(), attempt.url());

    let response = tokio::time::timeout(timeout, client.execute(attempt))
        .await
        .map_err(|_| {
            GatewayError::timeout(format!("request timed out after {}ms", timeout.as_millis()))
        })??;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(GatewayError::from_status(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status"),
        ));
    }
    Ok(response)
}
