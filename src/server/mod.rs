//! HTTP server implementation
//!
//! This module provides the HTTP server, its composition root and routing.

// Submodules
pub mod middleware;
pub mod routes;

pub mod builder;
pub mod server;
pub mod state;
mod utils;


pub use builder::{ServerBuilder, load_config, run_server};
pub use server::HttpServer;
pub use state::{AppState, PipelineSet};
