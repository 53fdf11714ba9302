//! # nosh-guard
//!
//! Resilience middleware for the CribNosh food-delivery API.
//!
//! ## Features
//!
//! - **Rate limiting**: fixed-window counters per client identity and endpoint class
//! - **Circuit breaking**: fail fast while a dependency is down, probe it once it may have recovered
//! - **Retries**: exponential backoff with jitter for transient failures only
//! - **Response caching**: byte-bounded, TTL-expiring cache of successful GET responses
//! - **Error translation**: every failure becomes a categorized JSON error with the right status
//!
//! ## Wrapping a handler
//!
//! ```rust,no_run
//! use nosh_guard::config::{Config, PipelineProfile};
//! use nosh_guard::core::types::{GatewayRequest, GatewayResponse};
//! use nosh_guard::server::AppState;
//! use nosh_guard::server::middleware::Handler;
//!
//! # async fn demo(request: GatewayRequest) -> nosh_guard::Result<()> {
//! let state = AppState::new(Config::from_env()?);
//! let menu = state.guard(PipelineProfile::General, |_req: GatewayRequest| async move {
//!     GatewayResponse::ok_json(&serde_json::json!({ "dishes": [] }))
//! });
//! let response = menu.call(request).await?;
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
