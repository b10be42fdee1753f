//! Sealbox key service binary.
//!
//! # Usage
//!
//! ```bash
//! sealbox-kms --host 127.0.0.1 --port 8001 --keys-dir keys
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sealbox_kms::{run_server, FsKeyStore, KmsConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Sealbox key management service
#[derive(Parser, Debug)]
#[command(name = "sealbox-kms")]
#[command(about = "Key management service for Sealbox envelope encryption")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value = "8001")]
    port: u16,

    /// Directory where key material is persisted
    #[arg(long, default_value = "keys")]
    keys_dir: PathBuf,

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

    tracing::info!("Sealbox key service starting");
    tracing::info!("Persisting key material under {}", args.keys_dir.display());

    let store = Arc::new(FsKeyStore::open(args.keys_dir).await?);

    let config = KmsConfig {
        host: args.host,
        port: args.port,
    };

    run_server(config, store).await?;

    Ok(())
}
