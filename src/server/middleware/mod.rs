//! HTTP middleware implementations
//!
//! This module provides the resilience pipeline and its building blocks:
//! - Request ID tracking
//! - Security screening (blocked clients, body size, origin, CSRF)
//! - Per-pipeline rate limiting, caching, retries and deadlines
//! - Error translation into the JSON error envelope

mod handler;
mod helpers;
mod pipeline;
mod request_id;
pub(crate) mod security;


pub use handler::{Handler, into_route, respond};
pub use helpers::{
    CACHE_HEADER, ClientIdentity, IdentityExtractor, IpIdentity, RATE_LIMIT_LIMIT_HEADER,
    RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER, RESPONSE_TIME_HEADER,
    apply_cors_headers, preflight_response,
};
pub use pipeline::{CacheKeyFn, Guarded, Pipeline, PipelineBuilder, PipelineStats};
pub use request_id::{
    REQUEST_ID_HEADER, RequestId, RequestIdMiddleware, RequestIdMiddlewareService,
    resolve_request_id,
};
pub use security::SecurityScreen;
