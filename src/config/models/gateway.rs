//! Main gateway configuration

#![allow(missing_docs)]

use super::*;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Deployment posture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Production posture sanitizes every outbound message
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(GatewayError::Config(format!("Unknown environment: {}", other))),
        }
    }
}

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub environment: Environment,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Request screening
    #[serde(default)]
    pub security: SecurityConfig,
    /// Response cache
    #[serde(default)]
    pub cache: CacheConfig,
    /// Circuit breakers
    #[serde(default)]
    pub breakers: BreakersConfig,
    /// Pipelines by endpoint class; missing means the environment's defaults
    #[serde(default)]
    pub pipelines: Option<PipelinesConfig>,
    /// Seconds between rate limiter and cache expiry sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl GatewayConfig {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            cache: CacheConfig::default(),
            breakers: BreakersConfig::default(),
            pipelines: Some(PipelinesConfig::for_environment(environment)),
            sweep_interval_secs: default_sweep_interval(),
        }
    }

    /// Defaults plus `NOSH_*` environment overrides
    pub fn from_env() -> Result<Self> {
        let environment = match std::env::var("NOSH_ENV") {
            Ok(value) => value.parse()?,
            Err(_) => Environment::default(),
        };
        let mut config = Self::for_environment(environment);

        if let Ok(host) = std::env::var("NOSH_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("NOSH_PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid NOSH_PORT: {}", e)))?;
        }
        if let Ok(origins) = std::env::var("NOSH_ALLOWED_ORIGINS") {
            config.server.cors.allowed_origins = parse_origins(&origins);
        }
        if let Ok(proxies) = std::env::var("NOSH_TRUSTED_PROXIES") {
            config.server.trusted_proxies = parse_origins(&proxies);
        }
        if let Ok(key) = std::env::var("NOSH_ADMIN_KEY") {
            config.security.admin_key = Some(key);
        }
        Ok(config)
    }

    /// Pipelines, falling back to the environment's defaults
    pub fn pipelines(&self) -> PipelinesConfig {
        self.pipelines
            .clone()
            .unwrap_or_else(|| PipelinesConfig::for_environment(self.environment))
    }
}

/// Split a comma separated list such as origins or proxy addresses
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}
