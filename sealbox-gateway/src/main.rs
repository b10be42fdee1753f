//! Sealbox encryption gateway binary.
//!
//! # Usage
//!
//! ```bash
//! sealbox-gateway --host 127.0.0.1 --port 8000 \
//!     --kms-url http://127.0.0.1:8001 --blobs-dir blobs
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sealbox_gateway::{run_server, FsBlobStore, GatewayConfig, HttpKeyClient};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Sealbox encryption gateway
#[derive(Parser, Debug)]
#[command(name = "sealbox-gateway")]
#[command(about = "Encryption gateway for Sealbox envelope encryption")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Base URL of the key service
    #[arg(long, default_value = "http://127.0.0.1:8001")]
    kms_url: String,

    /// Directory where encrypted blobs are persisted
    #[arg(long, default_value = "blobs")]
    blobs_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Sealbox gateway starting");
    tracing::info!("Key service at {}", args.kms_url);
    tracing::info!("Storing encrypted blobs under {}", args.blobs_dir.display());

    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        kms_base_url: args.kms_url,
        ..GatewayConfig::default()
    };

    let keys = Arc::new(HttpKeyClient::new(config.clone()));
    let blobs = Arc::new(FsBlobStore::open(args.blobs_dir).await?);

    run_server(config, keys, blobs).await?;

    Ok(())
}
