//! Circuit breaker configuration

use crate::utils::error::recovery::CircuitBreakerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for one breaker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakerSettings {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// Milliseconds the circuit stays open before a probe
    pub reset_timeout_ms: u64,
}

impl BreakerSettings {
    pub fn new(failure_threshold: u32, reset_timeout_ms: u64) -> Self {
        Self {
            failure_threshold,
            reset_timeout_ms,
        }
    }

    pub fn to_config(&self, name: &str) -> CircuitBreakerConfig {
        CircuitBreakerConfig::new(
            name,
            self.failure_threshold,
            Duration::from_millis(self.reset_timeout_ms),
        )
    }
}

/// One breaker per outbound dependency class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakersConfig {
    #[serde(default = "default_database")]
    pub database: BreakerSettings,
    #[serde(default = "default_email")]
    pub email: BreakerSettings,
    #[serde(default = "default_external")]
    pub external: BreakerSettings,
}

impl Default for BreakersConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            email: default_email(),
            external: default_external(),
        }
    }
}

fn default_database() -> BreakerSettings {
    BreakerSettings::new(5, 60_000)
}

fn default_email() -> BreakerSettings {
    BreakerSettings::new(3, 30_000)
}

fn default_external() -> BreakerSettings {
    BreakerSettings::new(5, 60_000)
}
