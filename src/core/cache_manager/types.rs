//! Cache manager type definitions
//!
//! Cache keys, stored entries and statistics.

use crate::core::types::GatewayRequest;
use actix_web::http::StatusCode;
use bytes::Bytes;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use url::form_urlencoded;

/// Cache key for one response
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key from method, path and the query string with its
    /// parameters sorted, so `?b=2&a=1` and `?a=1&b=2` share an entry.
    pub fn from_request(prefix: &str, request: &GatewayRequest) -> Self {
        let canonical = format!(
            "{}:{}?{}",
            request.method.as_str(),
            request.path,
            sorted_query(&request.query)
        );
        let digest = Sha256::digest(canonical.as_bytes());
        Self(format!("{}:{}", prefix, hex::encode(digest)))
    }

    /// Use a caller-chosen key under `prefix`
    pub fn explicit(prefix: &str, key: &str) -> Self {
        Self(format!("{}:{}", prefix, key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn sorted_query(query: &str) -> String {
    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Stored response with metadata
#[derive(Debug, Clone)]
pub(super) struct CacheEntry {
    pub(super) status: StatusCode,
    pub(super) body: Bytes,
    pub(super) stored_at: Instant,
    pub(super) ttl: Duration,
}

impl CacheEntry {
    pub(super) fn size(&self) -> usize {
        self.body.len()
    }

    /// Expired once its age reaches the TTL
    pub(super) fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) >= self.ttl
    }
}

/// Atomic cache statistics for lock-free hot path updates
#[derive(Debug, Default)]
pub(super) struct AtomicCacheStats {
    pub(super) hits: AtomicU64,
    pub(super) misses: AtomicU64,
    pub(super) stores: AtomicU64,
    pub(super) evictions: AtomicU64,
    pub(super) expirations: AtomicU64,
    pub(super) skipped: AtomicU64,
    pub(super) failures: AtomicU64,
}

impl AtomicCacheStats {
    pub(super) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Cache statistics snapshot (returned to callers)
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    /// Entries removed to make room
    pub evictions: u64,
    /// Entries removed because their TTL ran out
    pub expirations: u64,
    /// Responses too large to ever fit
    pub skipped: u64,
    /// Internal failures that degraded to a miss or a skipped store
    pub failures: u64,
    pub entries: usize,
    pub total_bytes: usize,
    pub max_bytes: usize,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
