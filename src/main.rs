//! GeeCache - A distributed read-through cache node
//!
//! Serves the peer protocol for its groups and, optionally, a front-end API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geecache::api::{create_api_router, create_router};
use geecache::{AppState, CacheError, Config, GetterFunc, Group, HttpPool, Registry};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the peer pool and register the `scores` group
/// 4. Start the front-end API server if `API_PORT` is set
/// 5. Serve the peer protocol on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geecache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting GeeCache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: self={}, peers={:?}, cache_bytes={}, port={}, api_port={:?}",
        config.self_url, config.peers, config.cache_bytes, config.server_port, config.api_port
    );

    let pool = Arc::new(HttpPool::with_base_path(&config.self_url, &config.base_path)?);
    pool.set_peers(&config.peers);

    let registry = Arc::new(Registry::new());
    let scores = registry.register(create_scores_group(config.cache_bytes).with_peers(pool.clone()));

    let api_handle = config.api_port.map(|port| {
        let group = scores.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_api(port, group).await {
                error!("Front-end API server failed: {:#}", e);
            }
        })
    });

    let app = create_router(AppState::new(registry, pool));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding peer listener on {}", addr))?;
    info!("GeeCache is running at {}", config.self_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = api_handle {
        handle.abort();
    }
    info!("Server shutdown complete");
    Ok(())
}

/// Demo group backed by a small in-memory "slow db".
fn create_scores_group(cache_bytes: usize) -> Group {
    let db: HashMap<&'static str, &'static str> =
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    Group::new(
        "scores",
        cache_bytes,
        GetterFunc(move |key: &str| {
            info!("[SlowDB] search key {}", key);
            db.get(key)
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| CacheError::NotFound(format!("{} not exist", key)))
        }),
    )
}

async fn serve_api(port: u16, group: Arc<Group>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding API listener on {}", addr))?;
    info!("Front-end API listening on http://{}", addr);

    axum::serve(listener, create_api_router(group)).await?;
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
