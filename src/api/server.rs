//! Axum server setup and startup

use std::net::SocketAddr;

use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

use super::routes::create_router;
use super::shared::SharedStateHandle;

/// Run the API server on the specified port with shared state
///
/// Resolves once the server stops, either on error or after the shutdown
/// signal flips.
pub async fn run_server(
    port: u16,
    shared_state: SharedStateHandle,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), std::io::Error> {
    // Overlay pages are served from the streaming software's own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(shared_state).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            tracing::info!("API server shutting down gracefully");
        })
        .await
}
