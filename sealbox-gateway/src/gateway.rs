//! Upload/download orchestration: resolve key, seal or open the envelope,
//! move bytes to and from the blob store.

use crate::blobstore::{validate_object_name, BlobStore};
use crate::error::{GatewayError, GatewayResult};
use crate::key_client::KeyResolver;
use sealbox_kms::KeyId;
use std::sync::Arc;
use tracing::{debug, info};

/// Suffix appended to a filename to form the stored object name.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Object name a file is stored under: the filename plus [`ENCRYPTED_SUFFIX`].
pub fn stored_name(filename: &str) -> String {
    format!("{filename}{ENCRYPTED_SUFFIX}")
}

/// Client-visible filename for a stored object: the suffix stripped, if
/// present.
pub fn original_name(stored: &str) -> &str {
    stored.strip_suffix(ENCRYPTED_SUFFIX).unwrap_or(stored)
}

/// Orchestrates encrypted file upload, download, and listing over injected
/// key resolution and blob storage.
///
/// Holds no state of its own: the key is re-resolved on every call and the
/// envelope codec is pure, so concurrent uploads and downloads never
/// contend.
#[derive(Clone)]
pub struct FileGateway {
    keys: Arc<dyn KeyResolver>,
    blobs: Arc<dyn BlobStore>,
}

impl FileGateway {
    pub fn new(keys: Arc<dyn KeyResolver>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { keys, blobs }
    }

    /// Encrypts `plaintext` under the key named by `key_id` and stores the
    /// envelope as `<filename>.enc`. Returns the stored object name.
    pub async fn upload(
        &self,
        key_id: &KeyId,
        filename: &str,
        plaintext: &[u8],
    ) -> GatewayResult<String> {
        validate_object_name(filename)?;

        let key = self.keys.resolve(key_id).await?;
        let envelope = sealbox_crypto::encrypt(&key, plaintext)
            .map_err(|e| GatewayError::Encryption(e.to_string()))?;

        let stored = stored_name(filename);
        self.blobs.put(&stored, envelope).await?;

        info!(
            "uploaded {stored} ({} plaintext bytes) under key {key_id}",
            plaintext.len()
        );
        Ok(stored)
    }

    /// Fetches the object stored under `stored`, resolves the key, and
    /// returns the decrypted plaintext.
    ///
    /// The object is fetched before the key so a missing object reports
    /// [`GatewayError::ObjectNotFound`] without a key-service round trip.
    pub async fn download(&self, key_id: &KeyId, stored: &str) -> GatewayResult<Vec<u8>> {
        validate_object_name(stored)?;

        let envelope = self.blobs.get(stored).await?;
        let key = self.keys.resolve(key_id).await?;
        let plaintext =
            sealbox_crypto::decrypt(&key, &envelope).map_err(|_| GatewayError::DecryptionFailed)?;

        debug!("decrypted {stored} ({} bytes)", plaintext.len());
        Ok(plaintext)
    }

    /// Lists stored object names verbatim, `.enc` suffix included.
    pub async fn list(&self) -> GatewayResult<Vec<String>> {
        self.blobs.list().await
    }
}
