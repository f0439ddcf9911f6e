use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hotspot_gateway::{AppState, Config, ConnectionPool, Result, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    tracing::info!(
        "Gateway for router at {} (pool of {})",
        config.router.address,
        config.pool.max_connections
    );

    let state = Arc::new(AppState::new(config.clone()));

    // Shutdown channel (graceful shutdown)
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Wait for Ctrl+C
    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    // Prune idle router connections in the background
    ConnectionPool::spawn_sweeper(state.pool.clone(), shutdown_rx.clone());

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr.parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address: {}", e);
        e
    })?;

    tracing::info!("Hotspot gateway starting on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - POST /login  - Hotspot credential check");
    tracing::info!("  - GET  /stats  - Active session counters");
    tracing::info!("  - GET  /health - Health check");

    // Run the server with graceful shutdown
    let mut server_shutdown = shutdown_rx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.changed().await;
            tracing::info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    Ok(())
}

fn setup_tracing() {
    // EnvFilter::from_default_env honors RUST_LOG; default to "info"
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
