//! HTTP API exposing repository analysis.

mod api_response;
mod routes;

pub use api_response::{AnalyzeSuccess, ApiError};
pub use routes::{AnalyzeRequest, AppState, HealthResponse, router};

use anyhow::Context;
use core::net::SocketAddr;

const LOG_TARGET: &str = "server";

/// Serves the API on `bind` until Ctrl-C is received.
pub async fn serve(state: AppState, bind: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding to {bind}"))?;
    let local_addr = listener.local_addr().context("reading the bound address")?;

    log::info!(target: LOG_TARGET, "Listening on http://{local_addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving the HTTP API")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!(target: LOG_TARGET, "Could not listen for Ctrl-C: {e}");
        core::future::pending::<()>().await;
    }
    log::info!(target: LOG_TARGET, "Shutting down");
}
