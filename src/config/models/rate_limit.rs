//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-window limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Window length in milliseconds
    pub window_ms: u64,
    /// Requests allowed per identity per window
    pub max_requests: u32,
    /// Namespace for this limiter's counters
    pub key_prefix: String,
}

impl RateLimitConfig {
    pub fn new<S: Into<String>>(key_prefix: S, window: Duration, max_requests: u32) -> Self {
        Self {
            enabled: true,
            window_ms: window.as_millis() as u64,
            max_requests,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Default limits for a pipeline profile.
    ///
    /// | profile    | window | production | development/test |
    /// |------------|--------|------------|------------------|
    /// | general    | 1 min  | 250        | 100              |
    /// | auth       | 5 min  | 125        | 200              |
    /// | sensitive  | 1 min  | 50         | 100              |
    /// | moderation | 1 min  | 100        | 100              |
    pub fn for_profile(profile: PipelineProfile, environment: Environment) -> Self {
        let production = environment.is_production();
        let (window, max) = match profile {
            PipelineProfile::General => (60, if production { 250 } else { 100 }),
            PipelineProfile::Auth => (5 * 60, if production { 125 } else { 200 }),
            PipelineProfile::Sensitive => (60, if production { 50 } else { 100 }),
            PipelineProfile::Moderation => (60, 100),
        };
        Self::new(profile.as_str(), Duration::from_secs(window), max)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::for_profile(PipelineProfile::General, Environment::default())
    }
}
