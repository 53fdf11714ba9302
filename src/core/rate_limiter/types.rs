//! Rate limiter types and data structures

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Rate limit decision for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Maximum requests allowed per window
    pub limit: u32,
    /// Remaining requests in the window
    pub remaining: u32,
    /// Time until the current window ends
    pub reset_in: Duration,
}

impl RateLimitResult {
    /// Seconds a rejected client should wait, rounded up and at least one
    pub fn retry_after_secs(&self) -> u64 {
        let millis = self.reset_in.as_millis() as u64;
        millis.div_ceil(1000).max(1)
    }
}

/// Read-only view of one identity's window
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub count: u32,
    pub limit: u32,
    pub remaining: u32,
    pub reset_in_ms: u64,
}

/// Counter for one identity within one window
#[derive(Debug, Clone)]
pub(super) struct WindowEntry {
    pub(super) count: u32,
    pub(super) window_reset_at: Instant,
}

impl WindowEntry {
    pub(super) fn open(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            window_reset_at: now + window,
        }
    }

    pub(super) fn is_expired(&self, now: Instant) -> bool {
        now >= self.window_reset_at
    }
}

/// Summary of a registered limiter
#[derive(Debug, Clone, Serialize)]
pub struct LimiterInfo {
    pub name: String,
    pub key_prefix: String,
    pub enabled: bool,
    pub window_ms: u64,
    pub max_requests: u32,
    pub tracked_identities: usize,
}
