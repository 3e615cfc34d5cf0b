//! API server lifecycle — bind, serve, shut down on ctrl-c.

use tokio::net::TcpListener;

use crate::api::router::api_router;
use crate::api::types::ApiContext;
use crate::sources::{GenerativeBackend, MedicineSource};

/// Bind to `host:port` and serve the API until a shutdown signal arrives.
pub async fn serve<S, G>(ctx: ApiContext<S, G>, host: &str, port: u16) -> Result<(), String>
where
    S: MedicineSource + Send + Sync + 'static,
    G: GenerativeBackend + Send + Sync + 'static,
{
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|e| format!("Failed to bind {host}:{port}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "medicine API server listening");

    axum::serve(listener, api_router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {e}"))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
