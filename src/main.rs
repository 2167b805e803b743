//! Bikes Compass - motorcycle catalog search API
//!
//! Binary entry point: loads configuration, wires the catalog store, presigner
//! and response cache, and serves the HTTP API.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bikes_compass::presign::ExpiringLinkPresigner;
use bikes_compass::store::MemoryBikeStore;
use bikes_compass::{create_router, AppState, Config};

/// Main entry point for the catalog server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Load the catalog and build the photo link issuer
/// 4. Create the response cache and query services
/// 5. Start HTTP server on configured address
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bikes_compass=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bikes Compass API");

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: cache_capacity={}, cache_ttl={}s, presign_lifetime={}s, presign_concurrency={}, addr={}",
        config.cache_capacity,
        config.cache_ttl,
        config.presign_lifetime,
        config.presign_concurrency,
        config.bind_addr()
    );

    let store = MemoryBikeStore::load(&config.catalog_path)
        .await
        .with_context(|| format!("failed to load catalog from {}", config.catalog_path.display()))?;
    let presigner = ExpiringLinkPresigner::parse(&config.presign_base_url)?;

    let state = AppState::from_config(&config, Arc::new(store), Arc::new(presigner));
    info!("Response cache and metrics recorder initialized");

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
