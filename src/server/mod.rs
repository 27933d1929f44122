//! HTTP service mode.
//!
//! This module provides:
//! - Configuration types (`config`)
//! - The axum router and handlers (`http`)
//! - Response envelopes (`response`)
//! - [`serve`], which binds and runs until Ctrl+C / SIGTERM

pub mod config;
pub mod http;
pub mod response;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::pipeline::ClassificationPipeline;
use crate::{Result, TriageError};

pub use http::router;

/// Serve the classification API on an already-bound listener.
///
/// Returns once a shutdown signal arrives and in-flight requests finish.
pub async fn serve(
    listener: TcpListener,
    pipeline: ClassificationPipeline,
    config: &config::ServerConfig,
) -> Result<()> {
    let app = router(pipeline, config);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TriageError::Http(format!("server error: {e}")))
}

/// Bind `addr`, mapping failures to a configuration error.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| TriageError::Configuration(format!("failed to bind {addr}: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("received terminate signal, starting graceful shutdown");
        },
    }
}
