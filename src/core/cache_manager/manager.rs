//! Response cache implementation

use super::types::{AtomicCacheStats, CacheEntry, CacheKey, CacheStats};
use crate::config::models::cache::CacheConfig;
use crate::core::types::{GatewayResponse, ResponseBody};
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderMap};
use lru::LruCache;
use parking_lot::Mutex;
use serde::de::IgnoredAny;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

struct CacheStore {
    /// Insertion ordered: reads use `peek`, so the LRU end is always the
    /// entry with the oldest `stored_at`
    entries: LruCache<String, CacheEntry>,
    total_bytes: usize,
}

impl CacheStore {
    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.pop(key)?;
        self.total_bytes = self.total_bytes.saturating_sub(entry.size());
        Some(entry)
    }
}

/// Byte-bounded in-memory cache of successful JSON GET responses
pub struct ResponseCache {
    config: CacheConfig,
    store: Mutex<CacheStore>,
    stats: AtomicCacheStats,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            store: Mutex::new(CacheStore {
                entries: LruCache::unbounded(),
                total_bytes: 0,
            }),
            stats: AtomicCacheStats::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a fresh response. Expired entries are removed and count as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<GatewayResponse> {
        if !self.config.enabled {
            return None;
        }

        let now = Instant::now();
        let mut store = self.store.lock();

        let expired = match store.entries.peek(key.as_str()) {
            None => {
                AtomicCacheStats::bump(&self.stats.misses);
                return None;
            }
            Some(entry) if !entry.is_expired(now) => {
                AtomicCacheStats::bump(&self.stats.hits);
                debug!("Cache hit for {}", key);
                return Some(GatewayResponse {
                    status: entry.status,
                    headers: HeaderMap::new(),
                    body: ResponseBody::Json(entry.body.clone()),
                });
            }
            Some(_) => true,
        };

        if expired {
            store.remove(key.as_str());
            AtomicCacheStats::bump(&self.stats.expirations);
        }
        AtomicCacheStats::bump(&self.stats.misses);
        None
    }

    /// Store a response if it is cacheable, returning whether it was stored.
    ///
    /// Only GET requests with a 2xx JSON body qualify, and responses marked
    /// per-client (`Set-Cookie`, `Cache-Control: private` or `no-store`) are
    /// never stored. Only the status and body are kept; handler headers are
    /// not replayed on a hit. Entries larger than the whole budget are skipped
    /// without evicting anything; otherwise the oldest entries are evicted one
    /// at a time until the new one fits.
    pub fn set(
        &self,
        key: &CacheKey,
        method: &Method,
        response: &GatewayResponse,
        ttl: Duration,
    ) -> bool {
        if !self.config.enabled || *method != Method::GET || !response.status.is_success() {
            return false;
        }
        let ResponseBody::Json(body) = &response.body else {
            return false;
        };
        if is_private(&response.headers) {
            AtomicCacheStats::bump(&self.stats.skipped);
            debug!("Not caching {}: response is private to its client", key);
            return false;
        }
        if let Err(e) = serde_json::from_slice::<IgnoredAny>(body) {
            AtomicCacheStats::bump(&self.stats.failures);
            warn!("Not caching {}: body is not valid JSON: {}", key, e);
            return false;
        }

        let entry = CacheEntry {
            status: response.status,
            body: body.clone(),
            stored_at: Instant::now(),
            ttl,
        };
        let size = entry.size();
        if size > self.config.max_bytes {
            AtomicCacheStats::bump(&self.stats.skipped);
            debug!(
                "Not caching {}: {} bytes exceeds budget of {}",
                key, size, self.config.max_bytes
            );
            return false;
        }

        let mut store = self.store.lock();
        store.remove(key.as_str());
        while store.total_bytes + size > self.config.max_bytes {
            match store.entries.pop_lru() {
                Some((evicted_key, evicted)) => {
                    store.total_bytes = store.total_bytes.saturating_sub(evicted.size());
                    AtomicCacheStats::bump(&self.stats.evictions);
                    debug!("Evicted {} ({} bytes)", evicted_key, evicted.size());
                }
                None => break,
            }
        }
        store.total_bytes += size;
        store.entries.put(key.as_str().to_string(), entry);
        AtomicCacheStats::bump(&self.stats.stores);
        true
    }

    /// Remove one entry
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.store.lock().remove(key.as_str()).is_some()
    }

    /// Remove every entry whose key starts with `prefix`
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut store = self.store.lock();
        let keys: Vec<String> = store
            .entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            store.remove(key);
        }
        keys.len()
    }

    /// Drop everything
    pub fn clear(&self) {
        let mut store = self.store.lock();
        store.entries.clear();
        store.total_bytes = 0;
    }

    /// Remove expired entries, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut store = self.store.lock();
        let expired: Vec<String> = store
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            store.remove(key);
        }
        self.stats
            .expirations
            .fetch_add(expired.len() as u64, Ordering::Relaxed);
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.store.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently held
    pub fn total_bytes(&self) -> usize {
        self.store.lock().total_bytes
    }

    pub fn stats(&self) -> CacheStats {
        let (entries, total_bytes) = {
            let store = self.store.lock();
            (store.entries.len(), store.total_bytes)
        };
        CacheStats {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            stores: self.stats.stores.load(Ordering::Relaxed),
            evictions: self.stats.evictions.load(Ordering::Relaxed),
            expirations: self.stats.expirations.load(Ordering::Relaxed),
            skipped: self.stats.skipped.load(Ordering::Relaxed),
            failures: self.stats.failures.load(Ordering::Relaxed),
            entries,
            total_bytes,
            max_bytes: self.config.max_bytes,
        }
    }
}

/// Whether a response carries state meant for a single client
fn is_private(headers: &HeaderMap) -> bool {
    if headers.contains_key(header::SET_COOKIE) {
        return true;
    }
    headers
        .get_all(header::CACHE_CONTROL)
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|directive| directive.trim().to_ascii_lowercase())
        .any(|directive| directive == "private" || directive == "no-store")
}
