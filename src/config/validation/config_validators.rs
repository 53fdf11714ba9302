//! Core configuration validators
//!
//! Validation for the gateway configuration root and its server, security
//! and breaker sections.

use super::trait_def::Validate;
use crate::config::models::*;
use std::net::IpAddr;
use tracing::{debug, warn};

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gateway configuration");

        self.server.validate()?;
        self.security.validate()?;
        self.cache.validate()?;
        self.breakers.validate()?;
        if let Some(pipelines) = &self.pipelines {
            pipelines.validate()?;
        }

        if self.sweep_interval_secs == 0 {
            return Err("Sweep interval must be greater than 0".to_string());
        }

        if self.environment.is_production() {
            if !self.server.cors.is_restricted() {
                return Err("Production requires an explicit CORS origin allow-list".to_string());
            }
            if self.security.admin_key.is_none() {
                warn!("No admin key configured in production; rate limit reset is disabled");
            }
        }

        debug!("Gateway configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
            if workers > 1000 {
                return Err("Worker count seems too high (>1000)".to_string());
            }
        }

        for proxy in &self.trusted_proxies {
            proxy
                .parse::<IpAddr>()
                .map_err(|_| format!("Invalid trusted proxy address: {}", proxy))?;
        }

        self.cors.validate()
    }
}

impl Validate for CorsConfig {
    fn validate(&self) -> Result<(), String> {
        for origin in &self.allowed_origins {
            if origin == "*" {
                continue;
            }
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(format!(
                    "CORS origin must start with http:// or https://: {}",
                    origin
                ));
            }
        }
        if self.allowed_methods.is_empty() {
            return Err("At least one CORS method must be allowed".to_string());
        }
        if self.allow_credentials && !self.is_restricted() {
            return Err("CORS credentials cannot be combined with a wildcard origin".to_string());
        }
        Ok(())
    }
}

impl Validate for SecurityConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_body_size == 0 {
            return Err("Max body size must be greater than 0".to_string());
        }

        for ip in &self.blocked_ips {
            ip.parse::<IpAddr>()
                .map_err(|_| format!("Invalid blocked IP address: {}", ip))?;
        }

        if self.blocked_user_agents.iter().any(|ua| ua.trim().is_empty()) {
            return Err("Blocked user agent patterns cannot be empty".to_string());
        }

        if self.csrf.enabled
            && (self.csrf.header_name.is_empty() || self.csrf.cookie_name.is_empty())
        {
            return Err("CSRF header and cookie names are required".to_string());
        }

        if let Some(key) = &self.admin_key {
            if key.len() < 16 {
                return Err("Admin key must be at least 16 characters".to_string());
            }
        }

        Ok(())
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.max_bytes == 0 {
            return Err("Cache byte budget must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for BreakerSettings {
    fn validate(&self) -> Result<(), String> {
        if self.failure_threshold == 0 {
            return Err("Breaker failure threshold must be greater than 0".to_string());
        }
        if self.reset_timeout_ms == 0 {
            return Err("Breaker reset timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for BreakersConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, settings) in [
            ("database", &self.database),
            ("email", &self.email),
            ("external", &self.external),
        ] {
            settings
                .validate()
                .map_err(|e| format!("{} breaker: {}", name, e))?;
        }
        Ok(())
    }
}
