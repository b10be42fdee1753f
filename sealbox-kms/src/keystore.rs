//! Key lifecycle: generate, retrieve, delete.

use crate::error::{KmsError, KmsResult};
use crate::store::KeyMaterialStore;
use crate::types::{KeyId, KeyMaterial};
use sealbox_crypto::{derive_key, DerivedKey};
use std::sync::Arc;
use tracing::{debug, info};

/// Key lifecycle service over an injected material store.
///
/// Holds no derived keys and no cache: every [`retrieve`](Self::retrieve)
/// recomputes the key from the persisted `(secret, salt)` pair, so a
/// completed [`delete`](Self::delete) is visible to the very next
/// retrieval.
#[derive(Clone)]
pub struct KeyStore {
    store: Arc<dyn KeyMaterialStore>,
}

impl KeyStore {
    pub fn new(store: Arc<dyn KeyMaterialStore>) -> Self {
        Self { store }
    }

    /// Generates and persists a fresh key record, returning its identifier.
    ///
    /// Identifiers are random UUIDs, so concurrent generates cannot collide.
    pub async fn generate(&self) -> KmsResult<KeyId> {
        let id = KeyId::generate();
        let material = KeyMaterial::generate();
        self.store.put(&id, &material).await?;
        info!("generated key {id}");
        Ok(id)
    }

    /// Re-derives and returns the 32-byte key for `id`.
    ///
    /// Read-only: the persisted record is never mutated.
    pub async fn retrieve(&self, id: &KeyId) -> KmsResult<DerivedKey> {
        let material = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| KmsError::KeyNotFound(id.to_string()))?;
        debug!("derived key for {id}");
        Ok(derive_key(material.secret(), &material.salt()))
    }

    /// Removes the record for `id`.
    ///
    /// Not idempotent: deleting an identifier that no longer exists fails
    /// with [`KmsError::KeyNotFound`].
    pub async fn delete(&self, id: &KeyId) -> KmsResult<()> {
        if !self.store.delete(id).await? {
            return Err(KmsError::KeyNotFound(id.to_string()));
        }
        info!("deleted key {id}");
        Ok(())
    }
}
