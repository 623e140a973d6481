//! sl-server: HTTP front for the structure analysis pipeline.
//!
//! This crate ties sl-core and sl-vision into a running server. It provides:
//!
//! - `POST /upload` to analyze an image, `GET /results/{name}` to fetch the
//!   annotated copy, and static serving of the front-end at `/`
//! - On-disk storage for uploads and results
//! - Request IDs, CORS, HTTP tracing, and OpenAPI docs
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod storage;

use std::net::SocketAddr;

use sl_core::config::Config;

use crate::context::AppContext;

/// Start the structlens server.
///
/// Creates the storage directories, builds the router, and serves until a
/// shutdown signal is received.
pub async fn start(config: Config) -> sl_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| sl_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::new(config);
    ctx.store.ensure_dirs()?;
    tracing::info!(
        uploads = %ctx.store.upload_dir().display(),
        results = %ctx.store.result_dir().display(),
        "Storage ready"
    );

    let app = router::build_router(ctx, static_dir);

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| sl_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
