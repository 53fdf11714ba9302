//! Rate limiter administration
//!
//! Open in development and test. In production every call must carry the
//! configured admin key.

use crate::core::rate_limiter::LimiterInfo;
use crate::server::middleware::security::tokens_match;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/rate-limits")
            .route("", web::get().to(list_limiters))
            .route("/reset", web::post().to(reset_limiters)),
    );
}

/// Body of a reset request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetRequest {
    /// Admin key, required in production
    #[serde(default)]
    pub key: Option<String>,
    /// Reset only this identity instead of every window
    #[serde(default)]
    pub identity: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyQuery {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetSummary {
    pub reset: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

fn authorize(state: &AppState, provided: Option<&str>) -> Result<()> {
    if !state.config.environment().is_production() {
        return Ok(());
    }
    match (state.config.security().admin_key.as_deref(), provided) {
        (Some(expected), Some(provided)) if tokens_match(expected, provided) => Ok(()),
        _ => {
            warn!("Rejected rate limit admin call with an invalid key");
            Err(GatewayError::validation("Invalid reset key"))
        }
    }
}

async fn list_limiters(
    state: web::Data<AppState>,
    query: web::Query<KeyQuery>,
) -> Result<HttpResponse> {
    authorize(&state, query.key.as_deref())?;
    let limiters: Vec<LimiterInfo> = state.limiters.describe();
    Ok(HttpResponse::Ok().json(ApiResponse::success(limiters)))
}

async fn reset_limiters(
    state: web::Data<AppState>,
    body: Option<web::Json<ResetRequest>>,
) -> Result<HttpResponse> {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    authorize(&state, request.key.as_deref())?;

    let names: Vec<String> = state.limiters.names().map(str::to_string).collect();
    match &request.identity {
        Some(identity) => {
            let cleared = state.limiters.reset_identity(identity);
            info!("Reset rate limit windows of {} in {} limiters", identity, cleared);
        }
        None => state.limiters.reset_all(),
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(ResetSummary {
        reset: names,
        identity: request.identity,
        timestamp: chrono::Utc::now(),
    })))
}
