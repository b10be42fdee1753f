//! Key resolution against the key service.
//!
//! Every resolution is a fresh round trip by contract: nothing is cached
//! here, so a key deleted at the service is unusable on the very next call.
//! [`HttpKeyClient`] talks to a remote key service; [`DirectKeyClient`] wraps
//! an in-process [`KeyStore`] for tests and single-process deployments.

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use async_trait::async_trait;
use reqwest::Client;
use sealbox_crypto::DerivedKey;
use sealbox_kms::{KeyId, KeyStore, KmsError};
use serde::Deserialize;
use tracing::debug;

/// Resolves a key identifier to the 32-byte derived key.
#[async_trait]
pub trait KeyResolver: Send + Sync {
    /// Fails with [`GatewayError::KeyNotFound`] if the identifier names no
    /// record, and [`GatewayError::KeyServiceUnavailable`] if the round trip
    /// could not complete.
    async fn resolve(&self, id: &KeyId) -> GatewayResult<DerivedKey>;
}

/// Wire shape of the key service's retrieve-key response.
#[derive(Deserialize)]
struct RetrieveKeyResponse {
    /// 32-byte derived key, lowercase hex.
    key: String,
}

/// HTTP client for the key service's retrieve-key endpoint.
pub struct HttpKeyClient {
    client: Client,
    config: GatewayConfig,
}

impl HttpKeyClient {
    pub fn new(config: GatewayConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.key_request_timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self { client, config }
    }
}

#[async_trait]
impl KeyResolver for HttpKeyClient {
    async fn resolve(&self, id: &KeyId) -> GatewayResult<DerivedKey> {
        let url = format!("{}/kms/retrieve-key/{id}", self.config.kms_base_url);
        debug!("resolving key {id}");

        let resp = self.client.get(&url).send().await.map_err(|e| {
            GatewayError::KeyServiceUnavailable(format!("key service unreachable: {e}"))
        })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::KeyNotFound(id.to_string()));
        }

        let resp = resp
            .error_for_status()
            .map_err(|e| GatewayError::KeyService(e.to_string()))?;

        let body: RetrieveKeyResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::KeyService(format!("malformed key response: {e}")))?;

        let bytes = hex::decode(&body.key)
            .map_err(|e| GatewayError::KeyService(format!("invalid key encoding: {e}")))?;

        DerivedKey::try_from_slice(&bytes).map_err(|e| GatewayError::KeyService(e.to_string()))
    }
}

/// In-process resolver over a [`KeyStore`], skipping the HTTP hop.
///
/// Same contract as [`HttpKeyClient`]: no caching, every resolve re-derives
/// from the persisted record.
pub struct DirectKeyClient {
    keystore: KeyStore,
}

impl DirectKeyClient {
    pub fn new(keystore: KeyStore) -> Self {
        Self { keystore }
    }
}

#[async_trait]
impl KeyResolver for DirectKeyClient {
    async fn resolve(&self, id: &KeyId) -> GatewayResult<DerivedKey> {
        self.keystore.retrieve(id).await.map_err(|e| match e {
            KmsError::KeyNotFound(id) => GatewayError::KeyNotFound(id),
            KmsError::Persistence(msg) => GatewayError::KeyService(msg),
        })
    }
}
