//! Redirection middleware gateway.
//!
//! Request path:
//!
//! ```text
//! client ──▶ header renderer ──▶ redirect decider ──▶ upstream handler
//!                 │                     │
//!            template error        rule found (200)
//!                 ▼                     ▼
//!               500                 301 + Location
//! ```
//!
//! The redirect decider consults an external decision service per request;
//! any failure to reach it fails open and the request is forwarded.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use redirector::config::load_config;
use redirector::lifecycle::{signals, Shutdown};
use redirector::observability::logging;
use redirector::HttpServer;

#[derive(Parser)]
#[command(name = "redirector", about = "HTTP redirection middleware gateway")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, short)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        decision_service = %config.decision.base_url,
        decision_timeout_secs = config.decision.timeout_secs,
        header_count = config.headers.len(),
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        trigger.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
