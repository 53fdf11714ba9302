//! Types and configurations for error recovery patterns

use serde::Serialize;
use std::time::Duration;

/// Upper bound of the random jitter added to a backoff delay
pub const MAX_JITTER: Duration = Duration::from_millis(1000);

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    /// Circuit is closed, requests flow normally
    Closed,
    /// Circuit is open, requests are rejected
    Open,
    /// Circuit is half-open, a single probe is allowed through
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CircuitState::Closed => "CLOSED",
            CircuitState::Open => "OPEN",
            CircuitState::HalfOpen => "HALF_OPEN",
        };
        f.write_str(label)
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Name reported in errors and logs
    pub name: String,
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// Time the circuit stays open before a probe is allowed
    pub reset_timeout: Duration,
}

impl CircuitBreakerConfig {
    pub fn new<S: Into<String>>(name: S, failure_threshold: u32, reset_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            failure_threshold,
            reset_timeout,
        }
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self::new("default", 5, Duration::from_secs(60))
    }
}

/// Point-in-time view of a circuit breaker
#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerMetrics {
    pub name: String,
    pub state: CircuitState,
    /// Failures since the last success
    pub failure_count: u32,
    /// Milliseconds since the most recent failure, if any
    pub last_failure_ms_ago: Option<u64>,
    /// Calls rejected while open
    pub rejected_count: u64,
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Cap applied to the exponential delay
    pub max_delay: Duration,
    /// Backoff multiplier
    pub backoff_multiplier: f64,
    /// Whether to add up to one second of random jitter
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Preset for critical operations: more attempts, shorter first delay
    pub fn critical() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            ..Self::default()
        }
    }

    /// Same configuration with jitter disabled
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }
}
