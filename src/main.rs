//! Cache Node - in-memory key/value cache node
//!
//! Bounded LRU cache with per-entry TTL, swept by a background mark-and-sweep
//! crawler, served over a small HTTP API.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_node::api::create_router;
use cache_node::{spawn_crawler_task, AppState, Config, Crawler};

/// Main entry point for the cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the cache
/// 4. Start the background TTL crawler
/// 5. Serve the HTTP API on the configured port
/// 6. On SIGINT/SIGTERM, drain HTTP, let the crawler finish its cycle, report stats
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_node=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cache node");

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: max_entries={}, default_ttl={}s, port={}, crawl_interval={}s",
        config.max_entries, config.default_ttl, config.server_port, config.crawl_interval
    );

    let state = AppState::from_config(&config)?;
    info!("Cache initialized with capacity {}", state.cache.capacity());

    let crawler = spawn_crawler_task(Crawler::new(state.cache.clone()), config.crawl_interval);
    info!("Background crawler started");

    let cache = state.cache.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    crawler.shutdown().await;

    let stats = cache.stats();
    info!(
        "Shutdown complete: entries={}, hits={}, misses={}, evictions={}, expirations={}",
        stats.total_entries, stats.hits, stats.misses, stats.evictions, stats.expirations
    );
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
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
                warn!("Failed to install SIGTERM handler: {}", err);
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
