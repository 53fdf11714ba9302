//! Middleware pipeline wrapping a handler with the resilience stack
//!
//! Per request: pre-flight, security screen, rate limit, cache lookup,
//! timeout-guarded (optionally retried) handler run, cache store, then
//! response decoration or error translation.

use super::handler::Handler;
use super::helpers::{
    CACHE_HEADER, ClientIdentity, IdentityExtractor, RATE_LIMIT_LIMIT_HEADER,
    RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER, RESPONSE_TIME_HEADER,
    apply_cors_headers, preflight_response, set_header,
};
use super::request_id::{REQUEST_ID_HEADER, resolve_request_id};
use super::security::SecurityScreen;
use crate::config::{CacheConfig, CorsConfig, Environment, PipelineConfig, SecurityConfig};
use crate::core::cache_manager::{CacheKey, ResponseCache};
use crate::core::rate_limiter::{RateLimitResult, RateLimiter};
use crate::core::types::{GatewayRequest, GatewayResponse, RequestOutcome};
use crate::utils::error::recovery::RetryPolicy;
use crate::utils::error::{ERROR_TYPE_HEADER, ErrorResponse, ErrorUtils, GatewayError, Result};
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderValue};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tokio::time::Instant;
use tracing::{debug, error, warn};

/// Explicit cache key derivation for a pipeline
pub type CacheKeyFn = Arc<dyn Fn(&GatewayRequest) -> Option<String> + Send + Sync>;

#[derive(Debug, Default)]
struct PipelineCounters {
    total: AtomicU64,
    success: AtomicU64,
    cache_hits: AtomicU64,
    retried: AtomicU64,
    rate_limited: AtomicU64,
    security_rejected: AtomicU64,
    timeout: AtomicU64,
    upstream_error: AtomicU64,
    validation_error: AtomicU64,
}

/// Snapshot of a pipeline's request outcomes
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PipelineStats {
    pub total: u64,
    pub success: u64,
    pub cache_hits: u64,
    /// Requests whose handler ran more than once
    pub retried: u64,
    pub rate_limited: u64,
    pub security_rejected: u64,
    pub timeout: u64,
    pub upstream_error: u64,
    pub validation_error: u64,
}

impl PipelineCounters {
    fn record(&self, outcome: RequestOutcome) {
        self.total.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            RequestOutcome::Success => &self.success,
            RequestOutcome::RateLimited => &self.rate_limited,
            RequestOutcome::SecurityRejected => &self.security_rejected,
            RequestOutcome::Timeout => &self.timeout,
            RequestOutcome::UpstreamError => &self.upstream_error,
            RequestOutcome::ValidationError => &self.validation_error,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            total: self.total.load(Ordering::Relaxed),
            success: self.success.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            retried: self.retried.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            security_rejected: self.security_rejected.load(Ordering::Relaxed),
            timeout: self.timeout.load(Ordering::Relaxed),
            upstream_error: self.upstream_error.load(Ordering::Relaxed),
            validation_error: self.validation_error.load(Ordering::Relaxed),
        }
    }
}

/// Per-request state gathered while the pipeline runs
#[derive(Default)]
struct RequestContext {
    rate_limit: Option<RateLimitResult>,
}

/// A named, independently configured middleware pipeline
pub struct Pipeline {
    name: String,
    config: PipelineConfig,
    environment: Environment,
    cors: CorsConfig,
    screen: Arc<SecurityScreen>,
    limiter: Arc<RateLimiter>,
    cache: Arc<ResponseCache>,
    identity: Arc<dyn IdentityExtractor>,
    cache_key: Option<CacheKeyFn>,
    retry: Option<RetryPolicy>,
    counters: PipelineCounters,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("environment", &self.environment)
            .finish()
    }
}

/// Builder for [`Pipeline`]; unset collaborators get standalone defaults
pub struct PipelineBuilder {
    name: String,
    config: PipelineConfig,
    environment: Environment,
    cors: CorsConfig,
    screen: Option<Arc<SecurityScreen>>,
    limiter: Option<Arc<RateLimiter>>,
    cache: Option<Arc<ResponseCache>>,
    identity: Arc<dyn IdentityExtractor>,
    cache_key: Option<CacheKeyFn>,
}

impl PipelineBuilder {
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    pub fn security(mut self, screen: Arc<SecurityScreen>) -> Self {
        self.screen = Some(screen);
        self
    }

    pub fn limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityExtractor>) -> Self {
        self.identity = identity;
        self
    }

    /// Derive cache keys from the request instead of method, path and query
    pub fn cache_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&GatewayRequest) -> Option<String> + Send + Sync + 'static,
    {
        self.cache_key = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> Pipeline {
        let screen = self.screen.unwrap_or_else(|| {
            Arc::new(SecurityScreen::new(
                SecurityConfig::default(),
                self.cors.clone(),
            ))
        });
        let limiter = self
            .limiter
            .unwrap_or_else(|| Arc::new(RateLimiter::new(self.config.rate_limit.clone())));
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ResponseCache::new(CacheConfig::default())));
        let retry = self
            .config
            .retry
            .enabled
            .then(|| RetryPolicy::new(self.config.retry.to_retry_config()));

        Pipeline {
            name: self.name,
            config: self.config,
            environment: self.environment,
            cors: self.cors,
            screen,
            limiter,
            cache,
            identity: self.identity,
            cache_key: self.cache_key,
            retry,
            counters: PipelineCounters::default(),
        }
    }
}

impl Pipeline {
    pub fn builder<S: Into<String>>(name: S, config: PipelineConfig) -> PipelineBuilder {
        PipelineBuilder {
            name: name.into(),
            config,
            environment: Environment::default(),
            cors: CorsConfig::default(),
            screen: None,
            limiter: None,
            cache: None,
            identity: Arc::new(ClientIdentity),
            cache_key: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn stats(&self) -> PipelineStats {
        self.counters.snapshot()
    }

    /// Wrap `handler`, producing a handler with the same signature
    pub fn wrap<H: Handler>(self: &Arc<Self>, handler: H) -> Guarded<H> {
        Guarded {
            pipeline: self.clone(),
            handler: Arc::new(handler),
        }
    }

    /// Run one request through the pipeline. Never fails: errors become
    /// error responses.
    pub async fn handle<H: Handler + ?Sized>(
        &self,
        handler: &H,
        request: GatewayRequest,
    ) -> GatewayResponse {
        let started = Instant::now();
        let request_id = resolve_request_id(&request.headers);
        let origin = request.header("origin").map(str::to_string);

        if request.method == Method::OPTIONS {
            let mut response = preflight_response(&self.cors, origin.as_deref());
            set_header(&mut response, REQUEST_ID_HEADER, &request_id);
            return response;
        }

        let mut ctx = RequestContext::default();
        let mut response = match self.process(handler, &request, &mut ctx).await {
            Ok(response) => {
                self.counters.record(RequestOutcome::Success);
                response
            }
            Err(e) => self.error_response(&e, &request, &request_id),
        };

        if let Some(limit) = &ctx.rate_limit {
            apply_rate_limit_headers(&mut response, limit);
        }
        apply_cors_headers(&mut response, &self.cors, origin.as_deref());
        set_header(&mut response, REQUEST_ID_HEADER, &request_id);
        set_header(
            &mut response,
            RESPONSE_TIME_HEADER,
            format!("{}ms", started.elapsed().as_millis()),
        );
        response
    }

    async fn process<H: Handler + ?Sized>(
        &self,
        handler: &H,
        request: &GatewayRequest,
        ctx: &mut RequestContext,
    ) -> Result<GatewayResponse> {
        if self.config.security_enabled {
            self.screen.check(request)?;
        }

        let identity = self.identity.identify(request);
        let decision = self.limiter.check(&identity);
        let allowed = decision.allowed;
        ctx.rate_limit = Some(decision);
        if !allowed {
            return Err(GatewayError::RateLimit(format!(
                "{} limit reached for {}",
                self.name, identity
            )));
        }

        let cache_key = self.cache_key_for(request);
        if let Some(key) = &cache_key {
            if let Some(mut cached) = self.cache.get(key) {
                self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
                cached
                    .headers
                    .insert(CACHE_HEADER, HeaderValue::from_static("HIT"));
                return Ok(cached);
            }
        }

        let response = self.execute(handler, request).await?;

        if let Some(key) = &cache_key {
            self.cache
                .set(key, &request.method, &response, self.config.cache.ttl());
        }
        Ok(response)
    }

    fn cache_key_for(&self, request: &GatewayRequest) -> Option<CacheKey> {
        if !self.config.cache.enabled || request.method != Method::GET {
            return None;
        }
        let prefix = self.config.cache_prefix();
        match &self.cache_key {
            Some(derive) => derive(request).map(|key| CacheKey::explicit(prefix, &key)),
            None => Some(CacheKey::from_request(prefix, request)),
        }
    }

    /// Handler run under the pipeline deadline, retried when enabled.
    ///
    /// The deadline covers every attempt; when it passes, the in-flight
    /// attempt is dropped.
    async fn execute<H: Handler + ?Sized>(
        &self,
        handler: &H,
        request: &GatewayRequest,
    ) -> Result<GatewayResponse> {
        let attempts = AtomicU32::new(0);
        let invoke = || {
            attempts.fetch_add(1, Ordering::Relaxed);
            handler.call(request.clone())
        };

        let run = async {
            match &self.retry {
                Some(policy) => policy.run(invoke).await.result,
                None => invoke().await,
            }
        };

        let timeout = self.config.timeout();
        let result = match tokio::time::timeout(timeout, run).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(format!(
                "{} handler timed out after {}ms",
                self.name,
                timeout.as_millis()
            ))),
        };

        let attempts = attempts.load(Ordering::Relaxed);
        if attempts > 1 {
            self.counters.retried.fetch_add(1, Ordering::Relaxed);
            debug!(
                "{} {} on pipeline '{}' took {} attempts",
                request.method, request.path, self.name, attempts
            );
        }
        result
    }

    fn error_response(
        &self,
        error: &GatewayError,
        request: &GatewayRequest,
        request_id: &str,
    ) -> GatewayResponse {
        let production = self.environment.is_production();
        let described = ErrorUtils::describe(error, production);
        self.counters.record(RequestOutcome::from(described.category));

        let logged = if production {
            ErrorUtils::sanitize_message(&error.to_string())
        } else {
            error.to_string()
        };
        if described.status.is_server_error() {
            error!(
                request_id,
                "{} {} failed on pipeline '{}' ({}): {}",
                request.method, request.path, self.name, described.category, logged
            );
        } else {
            warn!(
                request_id,
                "{} {} rejected on pipeline '{}' ({}): {}",
                request.method, request.path, self.name, described.category, logged
            );
        }

        let body = ErrorResponse::new(
            described.category.code(),
            described.message,
            Some(request_id.to_string()),
        );
        let mut response = GatewayResponse::json(described.status, &body)
            .unwrap_or_else(|_| GatewayResponse::new(described.status));
        response.headers.insert(
            ERROR_TYPE_HEADER,
            HeaderValue::from_static(described.category.code()),
        );
        if let Some(secs) = described.retry_after_secs {
            set_header(&mut response, header::RETRY_AFTER, secs);
        }
        response
    }
}

fn apply_rate_limit_headers(response: &mut GatewayResponse, limit: &RateLimitResult) {
    set_header(response, RATE_LIMIT_LIMIT_HEADER, limit.limit);
    set_header(response, RATE_LIMIT_REMAINING_HEADER, limit.remaining);
    if !limit.allowed {
        let retry_after = limit.retry_after_secs();
        let reset_at = chrono::Utc::now().timestamp() + retry_after as i64;
        set_header(response, header::RETRY_AFTER, retry_after);
        set_header(response, RATE_LIMIT_RESET_HEADER, reset_at);
    }
}

/// A handler wrapped by a pipeline
pub struct Guarded<H> {
    pipeline: Arc<Pipeline>,
    handler: Arc<H>,
}

impl<H> Clone for Guarded<H> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<H> Guarded<H> {
    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }
}

#[async_trait]
impl<H: Handler> Handler for Guarded<H> {
    async fn call(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        Ok(self.pipeline.handle(self.handler.as_ref(), request).await)
    }
}
