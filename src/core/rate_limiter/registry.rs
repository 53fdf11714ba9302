//! Named limiter set shared by the pipelines and the admin routes

use super::limiter::RateLimiter;
use super::types::LimiterInfo;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Every rate limiter in the process, by name
#[derive(Debug, Clone, Default)]
pub struct RateLimiterRegistry {
    limiters: BTreeMap<String, Arc<RateLimiter>>,
}

impl RateLimiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a limiter, replacing any previous one with the same name
    pub fn register<S: Into<String>>(&mut self, name: S, limiter: Arc<RateLimiter>) {
        self.limiters.insert(name.into(), limiter);
    }

    pub fn get(&self, name: &str) -> Option<Arc<RateLimiter>> {
        self.limiters.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.limiters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }

    /// Clear every limiter
    pub fn reset_all(&self) {
        for limiter in self.limiters.values() {
            limiter.reset_all();
        }
        info!("Reset {} rate limiters", self.limiters.len());
    }

    /// Clear one identity across every limiter, returning how many held it
    pub fn reset_identity(&self, identity: &str) -> usize {
        self.limiters
            .values()
            .filter(|limiter| limiter.reset(identity))
            .count()
    }

    /// Sweep expired windows from every limiter
    pub fn cleanup(&self) -> usize {
        self.limiters.values().map(|l| l.cleanup()).sum()
    }

    pub fn describe(&self) -> Vec<LimiterInfo> {
        self.limiters
            .iter()
            .map(|(name, limiter)| {
                let config = limiter.config();
                LimiterInfo {
                    name: name.clone(),
                    key_prefix: config.key_prefix.clone(),
                    enabled: config.enabled,
                    window_ms: config.window_ms,
                    max_requests: config.max_requests,
                    tracked_identities: limiter.len(),
                }
            })
            .collect()
    }
}
