//! nosh-guard - resilience layer for the CribNosh API
//!
//! Serves the health, status and rate limit administration routes on top of
//! the pipelines.

#![allow(missing_docs)]

use clap::Parser;
use nosh_guard::server::{self, ServerBuilder};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nosh-guard", version, about)]
struct Args {
    /// YAML configuration file (defaults to config/gateway.yaml, then NOSH_* variables)
    #[arg(short, long, env = "NOSH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long, env = "NOSH_LOG_JSON")]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = match server::load_config(args.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut builder = ServerBuilder::new().with_config(config);
    if let Some(host) = args.host {
        builder = builder.with_host(host);
    }
    if let Some(port) = args.port {
        builder = builder.with_port(port);
    }

    match server::run_server(builder).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps the bind hints readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
