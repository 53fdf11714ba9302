//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    host: Option<String>,
    port: Option<u16>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the bind host
    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Override the bind port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let mut config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;
        if let Some(host) = self.host {
            config.gateway.server.host = host;
        }
        if let Some(port) = self.port {
            config.gateway.server.port = port;
        }
        HttpServer::new(&config)
    }
}

/// Load configuration from `path` when given, otherwise from the environment
pub async fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path).await,
        None => {
            let default_path = PathBuf::from("config/gateway.yaml");
            if tokio::fs::try_exists(&default_path).await.unwrap_or(false) {
                Config::from_file(default_path).await
            } else {
                warn!("No configuration file found, using defaults and NOSH_* overrides");
                Config::from_env()
            }
        }
    }
}

/// Run the server with automatic configuration loading
pub async fn run_server(builder: ServerBuilder) -> Result<()> {
    let server = builder.build()?;
    let state = server.state();
    info!(
        "nosh-guard {} starting in {} mode at http://{}",
        env!("CARGO_PKG_VERSION"),
        state.config.environment().as_str(),
        server.config().address()
    );
    info!("Routes: GET /health, GET /status, GET /admin/rate-limits, POST /admin/rate-limits/reset");

    server.start().await
}
