//! Per-endpoint-class pipeline configuration

use super::*;
use crate::utils::error::recovery::RetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint classes, each with its own pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineProfile {
    General,
    Sensitive,
    Auth,
    Moderation,
}

impl PipelineProfile {
    pub const ALL: [PipelineProfile; 4] = [
        PipelineProfile::General,
        PipelineProfile::Sensitive,
        PipelineProfile::Auth,
        PipelineProfile::Moderation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineProfile::General => "general",
            PipelineProfile::Sensitive => "sensitive",
            PipelineProfile::Auth => "auth",
            PipelineProfile::Moderation => "moderation",
        }
    }
}

impl std::fmt::Display for PipelineProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retry settings for a pipeline's handler invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrySettings {
    pub enabled: bool,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl RetrySettings {
    /// The critical retry profile
    pub fn critical(enabled: bool) -> Self {
        let critical = RetryConfig::critical();
        Self {
            enabled,
            max_attempts: critical.max_attempts,
            base_delay_ms: critical.base_delay.as_millis() as u64,
            max_delay_ms: critical.max_delay.as_millis() as u64,
            backoff_multiplier: critical.backoff_multiplier,
            jitter: critical.jitter,
        }
    }

    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            backoff_multiplier: self.backoff_multiplier,
            jitter: self.jitter,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self::critical(false)
    }
}

/// Response caching for a pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineCacheSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    /// Key namespace; defaults to the profile name
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl PipelineCacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for PipelineCacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_secs: default_cache_ttl(),
            key_prefix: None,
        }
    }
}

/// Complete configuration of one pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    pub rate_limit: RateLimitConfig,
    #[serde(default = "default_true")]
    pub security_enabled: bool,
    #[serde(default)]
    pub retry: RetrySettings,
    /// Deadline for the whole handler invocation, retries included
    pub timeout_ms: u64,
    #[serde(default)]
    pub cache: PipelineCacheSettings,
}

impl PipelineConfig {
    /// Defaults for a profile in an environment
    pub fn for_profile(profile: PipelineProfile, environment: Environment) -> Self {
        let rate_limit = RateLimitConfig::for_profile(profile, environment);
        match profile {
            PipelineProfile::General => Self {
                rate_limit,
                security_enabled: true,
                retry: RetrySettings::critical(true),
                timeout_ms: 30_000,
                cache: PipelineCacheSettings::default(),
            },
            PipelineProfile::Sensitive => Self {
                rate_limit,
                security_enabled: true,
                retry: RetrySettings::critical(false),
                timeout_ms: 30_000,
                cache: PipelineCacheSettings::default(),
            },
            PipelineProfile::Auth => Self {
                rate_limit,
                security_enabled: true,
                retry: RetrySettings::critical(false),
                timeout_ms: 10_000,
                cache: PipelineCacheSettings::default(),
            },
            PipelineProfile::Moderation => Self {
                rate_limit,
                security_enabled: true,
                retry: RetrySettings {
                    max_attempts: 3,
                    ..RetrySettings::critical(true)
                },
                timeout_ms: 15_000,
                cache: PipelineCacheSettings::default(),
            },
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache key namespace for this pipeline
    pub fn cache_prefix(&self) -> &str {
        self.cache
            .key_prefix
            .as_deref()
            .unwrap_or(&self.rate_limit.key_prefix)
    }
}

/// Pipelines by endpoint class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelinesConfig {
    pub general: PipelineConfig,
    pub sensitive: PipelineConfig,
    pub auth: PipelineConfig,
    pub moderation: PipelineConfig,
}

impl PipelinesConfig {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            general: PipelineConfig::for_profile(PipelineProfile::General, environment),
            sensitive: PipelineConfig::for_profile(PipelineProfile::Sensitive, environment),
            auth: PipelineConfig::for_profile(PipelineProfile::Auth, environment),
            moderation: PipelineConfig::for_profile(PipelineProfile::Moderation, environment),
        }
    }

    pub fn get(&self, profile: PipelineProfile) -> &PipelineConfig {
        match profile {
            PipelineProfile::General => &self.general,
            PipelineProfile::Sensitive => &self.sensitive,
            PipelineProfile::Auth => &self.auth,
            PipelineProfile::Moderation => &self.moderation,
        }
    }
}

impl Default for PipelinesConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}
