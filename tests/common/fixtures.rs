//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.

use actix_web::http::Method;
use nosh_guard::config::{Config, Environment, GatewayConfig, PipelineConfig, PipelineProfile};
use nosh_guard::core::types::{GatewayRequest, GatewayResponse};
use nosh_guard::server::middleware::Handler;
use nosh_guard::{GatewayError, Result};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Address every factory request originates from
pub const CLIENT_IP: &str = "203.0.113.24";

/// Factory for pipeline requests
pub struct RequestFactory;

impl RequestFactory {
    /// Request from the default mobile client
    pub fn new(method: Method, path: &str) -> GatewayRequest {
        GatewayRequest::new(method, path)
            .with_client_ip(CLIENT_IP.parse().expect("valid test address"))
            .with_header("user-agent", "CribNosh-Android/5.1")
    }

    pub fn get(path: &str) -> GatewayRequest {
        Self::new(Method::GET, path)
    }

    /// State-changing request carrying a matching CSRF header and cookie
    pub fn post_with_csrf(path: &str, body: serde_json::Value) -> GatewayRequest {
        Self::new(Method::POST, path)
            .with_header("content-type", "application/json")
            .with_header("x-csrf-token", "csrf-test-token")
            .with_header("cookie", "csrf_token=csrf-test-token")
            .with_body(body.to_string())
    }
}

/// Factory for handlers with observable behavior
pub struct HandlerFactory;

impl HandlerFactory {
    /// Handler answering `{"dishes": [...]}` and counting its calls
    pub fn counting() -> (impl Handler, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let handler = move |_req: GatewayRequest| {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                GatewayResponse::ok_json(&json!({ "dishes": ["jollof", "suya"], "served": n }))
            }
        };
        (handler, calls)
    }

    /// Handler failing `failures` times with `error` before succeeding
    pub fn flaky<F>(failures: u32, error: F) -> (impl Handler, Arc<AtomicU32>)
    where
        F: Fn() -> GatewayError + Send + Sync + 'static,
    {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let error = Arc::new(error);
        let handler = move |_req: GatewayRequest| {
            let counter = counter.clone();
            let error = error.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < failures {
                    Err(error())
                } else {
                    GatewayResponse::ok_json(&json!({ "status": "recovered" }))
                }
            }
        };
        (handler, calls)
    }

    /// Handler that always fails with the error built by `error`
    pub fn failing<F>(error: F) -> impl Handler
    where
        F: Fn() -> GatewayError + Send + Sync + 'static,
    {
        let error = Arc::new(error);
        move |_req: GatewayRequest| {
            let error = error.clone();
            async move { Err::<GatewayResponse, _>(error()) }
        }
    }
}

/// Factory for configurations
pub struct ConfigFactory;

impl ConfigFactory {
    pub fn config(environment: Environment) -> Config {
        Config {
            gateway: GatewayConfig::for_environment(environment),
        }
    }

    pub fn pipeline(profile: PipelineProfile) -> PipelineConfig {
        PipelineConfig::for_profile(profile, Environment::Development)
    }

    /// Parse a YAML document into a validated config
    pub fn from_yaml(yaml: &str) -> Result<Config> {
        Config::from_yaml(yaml)
    }
}
