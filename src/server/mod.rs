//! Server module - HTTP ingress for trading signals

pub mod routes;

use tokio::net::TcpListener;
use tracing::info;

use crate::common::errors::{ClientError, Result};

pub use routes::{create_router, AppState};

/// Serve the router until ctrl-c
pub async fn run_server(bind_address: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(|e| ClientError::Configuration(format!("cannot bind {}: {}", bind_address, e)))?;
    info!("Listening for signals on {}", bind_address);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal, cleaning up...");
        })
        .await
        .map_err(|e| ClientError::Internal(e.to_string()))
}
