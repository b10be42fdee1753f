//! Gateway server setup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::blobstore::BlobStore;
use crate::config::GatewayConfig;
use crate::gateway::FileGateway;
use crate::key_client::KeyResolver;
use crate::routes::{create_router, AppState};

/// Create the gateway server
pub async fn create_server(
    config: GatewayConfig,
    keys: Arc<dyn KeyResolver>,
    blobs: Arc<dyn BlobStore>,
) -> Result<(Router, SocketAddr), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState {
        gateway: FileGateway::new(keys, blobs),
    };

    let router = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    Ok((router, addr))
}

/// Run the gateway server
pub async fn run_server(
    config: GatewayConfig,
    keys: Arc<dyn KeyResolver>,
    blobs: Arc<dyn BlobStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (router, addr) = create_server(config, keys, blobs).await?;

    tracing::info!("gateway listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Start server in background (for testing)
pub async fn start_background_server(
    config: GatewayConfig,
    keys: Arc<dyn KeyResolver>,
    blobs: Arc<dyn BlobStore>,
) -> Result<SocketAddr, Box<dyn std::error::Error + Send + Sync>> {
    let (router, addr) = create_server(config, keys, blobs).await?;

    // Bind to get actual address (useful when port is 0)
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
