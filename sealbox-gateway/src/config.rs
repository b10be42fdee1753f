//! Gateway configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the encryption gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Address to bind (e.g., "127.0.0.1").
    pub host: String,

    /// Port to listen on. Use 0 to let the OS pick one.
    pub port: u16,

    /// Base URL of the key service (e.g., "http://127.0.0.1:8001").
    pub kms_base_url: String,

    /// Timeout for a key-resolution round trip (seconds).
    pub key_request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            kms_base_url: "http://127.0.0.1:8001".to_string(),
            key_request_timeout_secs: 10,
        }
    }
}
