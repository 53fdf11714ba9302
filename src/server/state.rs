//! Application state shared across HTTP handlers
//!
//! This is the composition root: every limiter, breaker, cache and pipeline
//! is constructed here once and shared by `Arc`.

use crate::config::{Config, PipelineProfile};
use crate::core::cache_manager::ResponseCache;
use crate::core::rate_limiter::{RateLimiter, RateLimiterRegistry};
use crate::core::sweeper::Sweeper;
use crate::server::middleware::{Guarded, Handler, Pipeline, PipelineStats, SecurityScreen};
use crate::utils::error::recovery::CircuitBreakers;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// One pipeline per endpoint class
#[derive(Debug)]
pub struct PipelineSet {
    pub general: Arc<Pipeline>,
    pub sensitive: Arc<Pipeline>,
    pub auth: Arc<Pipeline>,
    pub moderation: Arc<Pipeline>,
}

impl PipelineSet {
    pub fn get(&self, profile: PipelineProfile) -> &Arc<Pipeline> {
        match profile {
            PipelineProfile::General => &self.general,
            PipelineProfile::Sensitive => &self.sensitive,
            PipelineProfile::Auth => &self.auth,
            PipelineProfile::Moderation => &self.moderation,
        }
    }

    /// Outcome counters keyed by profile name
    pub fn stats(&self) -> BTreeMap<&'static str, PipelineStats> {
        PipelineProfile::ALL
            .iter()
            .map(|profile| (profile.as_str(), self.get(*profile).stats()))
            .collect()
    }
}

/// HTTP server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    pub limiters: Arc<RateLimiterRegistry>,
    pub cache: Arc<ResponseCache>,
    pub breakers: Arc<CircuitBreakers>,
    pub pipelines: Arc<PipelineSet>,
    started_at: Instant,
}

impl AppState {
    /// Build every shared component from `config`
    pub fn new(config: Config) -> Self {
        let gateway = &config.gateway;
        let environment = gateway.environment;
        let cors = gateway.server.cors.clone();
        let pipelines = gateway.pipelines();

        let screen = Arc::new(SecurityScreen::new(gateway.security.clone(), cors.clone()));
        let cache = Arc::new(ResponseCache::new(gateway.cache.clone()));
        let breakers = Arc::new(CircuitBreakers::new(
            gateway.breakers.database.to_config("database"),
            gateway.breakers.email.to_config("email"),
            gateway.breakers.external.to_config("external"),
        ));

        let mut limiters = RateLimiterRegistry::new();
        let mut build = |profile: PipelineProfile| {
            let pipeline_config = pipelines.get(profile).clone();
            let limiter = Arc::new(RateLimiter::new(pipeline_config.rate_limit.clone()));
            limiters.register(profile.as_str(), limiter.clone());
            Arc::new(
                Pipeline::builder(profile.as_str(), pipeline_config)
                    .environment(environment)
                    .cors(cors.clone())
                    .security(screen.clone())
                    .limiter(limiter)
                    .cache(cache.clone())
                    .build(),
            )
        };
        let pipelines = PipelineSet {
            general: build(PipelineProfile::General),
            sensitive: build(PipelineProfile::Sensitive),
            auth: build(PipelineProfile::Auth),
            moderation: build(PipelineProfile::Moderation),
        };

        info!(
            "Initialized {} rate limiters and {} pipelines for {} environment",
            limiters.len(),
            PipelineProfile::ALL.len(),
            environment.as_str()
        );

        Self {
            config: Arc::new(config),
            limiters: Arc::new(limiters),
            cache,
            breakers,
            pipelines: Arc::new(pipelines),
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wrap `handler` with the pipeline for `profile`
    pub fn guard<H: Handler>(&self, profile: PipelineProfile, handler: H) -> Guarded<H> {
        self.pipelines.get(profile).wrap(handler)
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Start the periodic sweep of expired limiter windows and cache entries
    pub fn spawn_sweeper(&self) -> Sweeper {
        let interval = Duration::from_secs(self.config.gateway.sweep_interval_secs.max(1));
        let limiters = self.limiters.clone();
        let cache = self.cache.clone();
        Sweeper::spawn("expiry", interval, move || {
            let windows = limiters.cleanup();
            let entries = cache.purge_expired();
            if windows + entries > 0 {
                debug!(
                    "Swept {} expired rate limit windows and {} cache entries",
                    windows, entries
                );
            }
        })
    }
}
