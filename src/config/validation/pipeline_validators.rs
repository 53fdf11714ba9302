//! Pipeline configuration validators
//!
//! Validation for pipelines and the rate limit, retry and cache settings
//! they carry.

use super::trait_def::Validate;
use crate::config::models::*;
use std::collections::HashSet;

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.window_ms == 0 {
            return Err("Rate limit window must be greater than 0".to_string());
        }

        if self.max_requests == 0 {
            return Err("Rate limit max requests must be greater than 0".to_string());
        }

        if self.key_prefix.is_empty() || self.key_prefix.contains(':') {
            return Err(format!(
                "Rate limit key prefix must be non-empty without ':': {:?}",
                self.key_prefix
            ));
        }

        Ok(())
    }
}

impl Validate for RetrySettings {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("Retry max attempts must be at least 1".to_string());
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err("Retry max delay cannot be below the base delay".to_string());
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err("Retry backoff multiplier must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Validate for PipelineCacheSettings {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.ttl_secs == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<(), String> {
        self.rate_limit.validate()?;
        self.retry.validate()?;
        self.cache.validate()?;
        if self.timeout_ms == 0 {
            return Err("Pipeline timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for PipelinesConfig {
    fn validate(&self) -> Result<(), String> {
        let mut prefixes = HashSet::new();
        for profile in PipelineProfile::ALL {
            let pipeline = self.get(profile);
            pipeline
                .validate()
                .map_err(|e| format!("{} pipeline: {}", profile, e))?;
            if !prefixes.insert(pipeline.rate_limit.key_prefix.as_str()) {
                return Err(format!(
                    "{} pipeline reuses rate limit prefix {:?}",
                    profile, pipeline.rate_limit.key_prefix
                ));
            }
        }
        Ok(())
    }
}
