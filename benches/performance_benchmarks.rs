//! Performance benchmarks for nosh-guard
//!
//! Hot paths exercised on every request: the rate limiter check, cache
//! lookups and stores, and a full pipeline pass.

use actix_web::http::Method;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nosh_guard::config::{
    CacheConfig, Environment, PipelineConfig, PipelineProfile, RateLimitConfig,
};
use nosh_guard::core::cache_manager::{CacheKey, ResponseCache};
use nosh_guard::core::rate_limiter::RateLimiter;
use nosh_guard::core::types::{GatewayRequest, GatewayResponse};
use nosh_guard::server::middleware::Pipeline;
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Benchmark rate limiter checks
fn bench_rate_limiter(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("rate_limiter");
    group.throughput(Throughput::Elements(1));

    for identities in [1usize, 1_000, 100_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("check", identities),
            identities,
            |b, &identities| {
                let _guard = rt.enter();
                let limiter = RateLimiter::new(RateLimitConfig::new(
                    "bench",
                    Duration::from_secs(60),
                    u32::MAX,
                ));
                let keys: Vec<String> = (0..identities).map(|i| format!("ip:{}", i)).collect();
                let mut i = 0;
                b.iter(|| {
                    i = (i + 1) % keys.len();
                    black_box(limiter.check(&keys[i]))
                });
            },
        );
    }

    group.finish();
}

/// Benchmark cache operations
fn bench_cache_operations(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache_operations");

    let response = GatewayResponse::ok_json(&json!({
        "dishes": (0..20).map(|i| json!({ "id": i, "name": format!("dish-{}", i) })).collect::<Vec<_>>()
    }))
    .unwrap();

    for entries in [100usize, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("cache_get", entries), entries, |b, &entries| {
            let _guard = rt.enter();
            let cache = ResponseCache::new(CacheConfig::default());
            let keys: Vec<CacheKey> = (0..entries)
                .map(|i| CacheKey::explicit("bench", &i.to_string()))
                .collect();
            for key in &keys {
                cache.set(key, &Method::GET, &response, Duration::from_secs(3600));
            }
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % keys.len();
                black_box(cache.get(&keys[i]))
            });
        });

        group.bench_with_input(BenchmarkId::new("cache_set", entries), entries, |b, &entries| {
            let _guard = rt.enter();
            let cache = ResponseCache::new(CacheConfig {
                enabled: true,
                max_bytes: response.body.len() * entries,
            });
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                let key = CacheKey::explicit("bench", &i.to_string());
                black_box(cache.set(&key, &Method::GET, &response, Duration::from_secs(3600)))
            });
        });
    }

    group.bench_function("cache_key_from_request", |b| {
        let request = GatewayRequest::new(Method::GET, "/api/dishes")
            .with_query("page=2&cuisine=thai&sort=rating&limit=20");
        b.iter(|| black_box(CacheKey::from_request("general", &request)));
    });

    group.finish();
}

/// Benchmark a full pipeline pass
fn bench_pipeline(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("pipeline");

    for cached in [false, true] {
        let mut config = PipelineConfig::for_profile(PipelineProfile::General, Environment::Production);
        config.rate_limit.max_requests = u32::MAX;
        config.cache.enabled = cached;
        let pipeline = {
            let _guard = rt.enter();
            Arc::new(Pipeline::builder("general", config).build())
        };
        let handler = |_req: GatewayRequest| async move {
            GatewayResponse::ok_json(&json!({ "dishes": ["jollof", "egusi"] }))
        };
        let request = GatewayRequest::new(Method::GET, "/api/dishes")
            .with_client_ip("203.0.113.1".parse().unwrap())
            .with_header("user-agent", "bench");

        group.bench_function(BenchmarkId::new("handle", if cached { "cached" } else { "uncached" }), |b| {
            b.iter(|| rt.block_on(async { black_box(pipeline.handle(&handler, request.clone()).await) }));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_rate_limiter,
    bench_cache_operations,
    bench_pipeline
);

criterion_main!(benches);
