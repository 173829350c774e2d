// bria-proxy - Thin HTTP backend for the Bria image API
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use bria_proxy::bria::BriaClient;
use bria_proxy::cli::Args;
use bria_proxy::config::AppConfig;
use bria_proxy::server::create_router;
use bria_proxy::utils::logging;
use clap::Parser;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up BRIA_API_TOKEN and friends from a local .env, if present
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting bria-proxy v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Validate configuration (a missing token is fatal here)
    config.validate()?;

    // Phase 4: Build the upstream client
    let bria_client = BriaClient::new(&config.bria)?;
    info!("Forwarding to Bria API at {}", bria_client.base_url());

    // Phase 5: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, bria_client)?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 6: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
