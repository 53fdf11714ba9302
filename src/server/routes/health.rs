//! Health check and status endpoints

use crate::config::PipelineProfile;
use crate::core::cache_manager::CacheStats;
use crate::core::types::{GatewayRequest, GatewayResponse};
use crate::server::middleware::{PipelineStats, into_route};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::recovery::{CircuitBreakerMetrics, CircuitState};
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Mount the pipeline status route, which itself runs through the general
/// pipeline
pub fn configure_status_route(
    state: &AppState,
) -> impl FnOnce(&mut web::ServiceConfig) + use<> {
    let status_state = state.clone();
    let guarded = state.guard(PipelineProfile::General, move |_req: GatewayRequest| {
        let state = status_state.clone();
        async move { GatewayResponse::ok_json(&ApiResponse::success(status_snapshot(&state))) }
    });
    move |cfg: &mut web::ServiceConfig| {
        cfg.service(web::resource("/status").route(into_route(Arc::new(guarded))));
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: Cow<'static, str>,
    pub environment: &'static str,
    pub uptime_seconds: u64,
    pub breakers: Vec<CircuitBreakerMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub pipelines: BTreeMap<&'static str, PipelineStats>,
    pub cache: CacheStats,
}

/// Basic health check endpoint
///
/// Reports `degraded` while any circuit breaker is not closed.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let breakers = state.breakers.metrics();
    let healthy = breakers.iter().all(|b| b.state == CircuitState::Closed);

    let health_status = HealthStatus {
        status: if healthy {
            Cow::Borrowed("healthy")
        } else {
            Cow::Borrowed("degraded")
        },
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        environment: state.config.environment().as_str(),
        uptime_seconds: state.uptime().as_secs(),
        breakers,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(health_status)))
}

fn status_snapshot(state: &AppState) -> StatusSnapshot {
    StatusSnapshot {
        pipelines: state.pipelines.stats(),
        cache: state.cache.stats(),
    }
}
