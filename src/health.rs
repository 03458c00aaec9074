//! Liveness endpoint.
//!
//! `GET /queue_1/health` always answers `200 Ok`. It does not look at the
//! consumer, so it keeps answering after the consumption loop has died.

use std::net::SocketAddr;

use axum::{Router, http::StatusCode, routing::get};
use tokio::net::TcpListener;
use tracing::info;

use crate::shutdown::ShutdownSignal;

/// Path of the health check.
pub const HEALTH_PATH: &str = "/queue_1/health";

async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Ok")
}

/// Router serving only the health route.
pub fn health_router() -> Router {
    Router::new().route(HEALTH_PATH, get(health_check))
}

/// Serves the health router on an already bound listener until `shutdown`
/// fires.
pub async fn serve_health(
    listener: TcpListener,
    mut shutdown: ShutdownSignal,
) -> Result<(), std::io::Error> {
    axum::serve(listener, health_router())
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}

/// Binds `addr` and serves the health endpoint until `shutdown` fires.
pub async fn run_health_server(
    addr: SocketAddr,
    shutdown: ShutdownSignal,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, path = HEALTH_PATH, "Health server listening");

    serve_health(listener, shutdown).await
}
