//! Helper functions for middleware

use crate::config::CorsConfig;
use crate::core::types::{GatewayRequest, GatewayResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderName, HeaderValue};
use sha2::{Digest, Sha256};

pub const RESPONSE_TIME_HEADER: HeaderName = HeaderName::from_static("x-response-time");
pub const CACHE_HEADER: HeaderName = HeaderName::from_static("x-cache");
pub const RATE_LIMIT_LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const RATE_LIMIT_REMAINING_HEADER: HeaderName =
    HeaderName::from_static("x-ratelimit-remaining");
pub const RATE_LIMIT_RESET_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Derives the key a rate limiter buckets a client by
pub trait IdentityExtractor: Send + Sync {
    fn identify(&self, request: &GatewayRequest) -> String;
}

/// Client address plus a short digest of the user agent.
///
/// Clients behind one NAT with different browsers get separate buckets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientIdentity;

impl IdentityExtractor for ClientIdentity {
    fn identify(&self, request: &GatewayRequest) -> String {
        let ip = request
            .client_ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let agent = request.header("user-agent").unwrap_or("");
        let digest = Sha256::digest(agent.as_bytes());
        format!("{}:{}", ip, &hex::encode(digest)[..16])
    }
}

/// Client address only
#[derive(Debug, Clone, Copy, Default)]
pub struct IpIdentity;

impl IdentityExtractor for IpIdentity {
    fn identify(&self, request: &GatewayRequest) -> String {
        request
            .client_ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn insert(response: &mut GatewayResponse, name: HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        response.headers.insert(name, value);
    }
}

/// Value for `Access-Control-Allow-Origin`: an allowed origin is echoed
/// back, and without an origin an unrestricted list answers with the wildcard
fn allow_origin<'a>(cors: &CorsConfig, origin: Option<&'a str>) -> Option<&'a str> {
    match origin {
        Some(origin) if cors.is_origin_allowed(origin) => Some(origin),
        Some(_) => None,
        None if !cors.is_restricted() => Some("*"),
        None => None,
    }
}

/// Credentials are only granted to origins on an explicit allow-list
fn grants_credentials(cors: &CorsConfig, origin: Option<&str>) -> bool {
    cors.allow_credentials
        && cors.is_restricted()
        && origin.is_some_and(|origin| cors.is_origin_allowed(origin))
}

/// Attach CORS headers for the request's origin
pub fn apply_cors_headers(response: &mut GatewayResponse, cors: &CorsConfig, origin: Option<&str>) {
    let Some(allowed) = allow_origin(cors, origin) else {
        return;
    };
    insert(response, header::ACCESS_CONTROL_ALLOW_ORIGIN, allowed);
    if origin.is_some() {
        response
            .headers
            .insert(header::VARY, HeaderValue::from_static("Origin"));
    }
    if grants_credentials(cors, origin) {
        insert(response, header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
    }
}

/// Empty 200 answering a CORS preflight
pub fn preflight_response(cors: &CorsConfig, origin: Option<&str>) -> GatewayResponse {
    let mut response = GatewayResponse::new(StatusCode::OK);
    apply_cors_headers(&mut response, cors, origin);
    insert(
        &mut response,
        header::ACCESS_CONTROL_ALLOW_METHODS,
        &cors.allowed_methods.join(", "),
    );
    insert(
        &mut response,
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        &cors.allowed_headers.join(", "),
    );
    insert(
        &mut response,
        header::ACCESS_CONTROL_MAX_AGE,
        &cors.max_age.to_string(),
    );
    response
}

/// Set a header from any displayable value
pub fn set_header<V: ToString>(response: &mut GatewayResponse, name: HeaderName, value: V) {
    insert(response, name, &value.to_string());
}
