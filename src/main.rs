//! OSRS Price Monitor - Grand Exchange price dashboard backend
//!
//! Serves item metadata and live prices from the OSRS Wiki prices API,
//! memoized in a TTL/LRU cache so polling clients don't hammer upstream.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use osrs_price_monitor::api::create_router;
use osrs_price_monitor::upstream::OsrsClient;
use osrs_price_monitor::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the price monitor server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the upstream client and the cache
/// 4. Start the background TTL sweep, if enabled
/// 5. Serve the router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "osrs_price_monitor=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OSRS Price Monitor");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, default_ttl={}ms, port={}, cleanup_interval={}s, api_base={}",
        config.max_entries,
        config.default_ttl_ms,
        config.server_port,
        config.cleanup_interval,
        config.api_base
    );

    let client = OsrsClient::new(&config.upstream()).context("failed to build upstream client")?;
    let state = AppState::from_config(&config, Arc::new(client));
    info!("Cache store initialized");

    let cleanup_handle = if config.cleanup_interval > 0 {
        let handle = spawn_cleanup_task(state.memo.store(), config.cleanup_interval);
        info!("Background cleanup task started");
        Some(handle)
    } else {
        info!("Background cleanup disabled, expiry is enforced on read only");
        None
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweep.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
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

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
