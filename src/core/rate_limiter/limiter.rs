//! Core rate limiter implementation

use super::types::{RateLimitResult, RateLimitStatus, WindowEntry};
use crate::config::models::rate_limit::RateLimitConfig;
use crate::utils::error::{GatewayError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Fixed-window rate limiter.
///
/// Counters are keyed by `"{key_prefix}:{identity}"`. The check and the
/// increment for one key happen under the same shard lock, so concurrent
/// requests for an identity can never both take the last slot.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    pub(super) config: RateLimitConfig,
    pub(super) entries: Arc<DashMap<String, WindowEntry>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Arc::new(DashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn window(&self) -> Duration {
        self.config.window()
    }

    /// Get the configured limit
    pub fn limit(&self) -> u32 {
        self.config.max_requests
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub(super) fn key(&self, identity: &str) -> String {
        format!("{}:{}", self.config.key_prefix, identity)
    }

    /// Count a request for `identity` and decide whether it may proceed.
    ///
    /// Internal failures allow the request.
    pub fn check(&self, identity: &str) -> RateLimitResult {
        match self.try_check(identity) {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    "Rate limiter '{}' failed open for {}: {}",
                    self.config.key_prefix, identity, e
                );
                self.entries.remove(&self.key(identity));
                RateLimitResult {
                    allowed: true,
                    limit: self.config.max_requests,
                    remaining: self.config.max_requests,
                    reset_in: self.window(),
                }
            }
        }
    }

    /// Check and record, surfacing internal failures
    pub fn try_check(&self, identity: &str) -> Result<RateLimitResult> {
        let max = self.config.max_requests;
        if !self.config.enabled {
            return Ok(RateLimitResult {
                allowed: true,
                limit: max,
                remaining: max,
                reset_in: Duration::ZERO,
            });
        }

        let now = Instant::now();
        let window = self.window();

        match self.entries.entry(self.key(identity)) {
            Entry::Vacant(vacant) => {
                vacant.insert(WindowEntry::open(now, window));
                Ok(RateLimitResult {
                    allowed: true,
                    limit: max,
                    remaining: max.saturating_sub(1),
                    reset_in: window,
                })
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.is_expired(now) {
                    *entry = WindowEntry::open(now, window);
                    return Ok(RateLimitResult {
                        allowed: true,
                        limit: max,
                        remaining: max.saturating_sub(1),
                        reset_in: window,
                    });
                }
                if entry.count == 0 {
                    return Err(GatewayError::Internal(format!(
                        "corrupt rate limit entry for {}:{}",
                        self.config.key_prefix, identity
                    )));
                }

                let reset_in = entry.window_reset_at.saturating_duration_since(now);
                if entry.count < max {
                    entry.count += 1;
                    Ok(RateLimitResult {
                        allowed: true,
                        limit: max,
                        remaining: max - entry.count,
                        reset_in,
                    })
                } else {
                    debug!(
                        "Rate limit '{}' exceeded for {} ({}/{})",
                        self.config.key_prefix, identity, entry.count, max
                    );
                    Ok(RateLimitResult {
                        allowed: false,
                        limit: max,
                        remaining: 0,
                        reset_in,
                    })
                }
            }
        }
    }

    /// Current window for `identity` without counting a request
    pub fn status(&self, identity: &str) -> Option<RateLimitStatus> {
        let now = Instant::now();
        let entry = self.entries.get(&self.key(identity))?;
        if entry.is_expired(now) {
            return None;
        }
        Some(RateLimitStatus {
            count: entry.count,
            limit: self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(entry.count),
            reset_in_ms: entry.window_reset_at.saturating_duration_since(now).as_millis() as u64,
        })
    }

    /// Forget the window for one identity
    pub fn reset(&self, identity: &str) -> bool {
        self.entries.remove(&self.key(identity)).is_some()
    }

    /// Forget every window
    pub fn reset_all(&self) {
        self.entries.clear();
    }

    /// Drop entries whose window has ended, returning how many were removed
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of identities currently tracked
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
