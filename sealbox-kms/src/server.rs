//! Key service server setup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::keystore::KeyStore;
use crate::routes::{create_router, AppState};
use crate::store::KeyMaterialStore;

/// Configuration for the key service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KmsConfig {
    /// Address to bind (e.g., "127.0.0.1").
    pub host: String,

    /// Port to listen on. Use 0 to let the OS pick one.
    pub port: u16,
}

impl Default for KmsConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
        }
    }
}

/// Create the key service server
pub async fn create_server(
    config: KmsConfig,
    store: Arc<dyn KeyMaterialStore>,
) -> Result<(Router, SocketAddr), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState {
        keystore: KeyStore::new(store),
    };

    let router = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    Ok((router, addr))
}

/// Run the key service server
pub async fn run_server(
    config: KmsConfig,
    store: Arc<dyn KeyMaterialStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (router, addr) = create_server(config, store).await?;

    tracing::info!("key service listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Start server in background (for testing)
pub async fn start_background_server(
    config: KmsConfig,
    store: Arc<dyn KeyMaterialStore>,
) -> Result<SocketAddr, Box<dyn std::error::Error + Send + Sync>> {
    let (router, addr) = create_server(config, store).await?;

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
