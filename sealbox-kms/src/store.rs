//! Durable storage of key material.
//!
//! Backends are dumb keyed byte stores; lifecycle policy (not-found on a
//! second delete, re-derivation per retrieval) lives in
//! [`KeyStore`](crate::keystore::KeyStore). Absence is reported with
//! `Option`/`bool` rather than an error so the backends stay
//! interchangeable.

use crate::error::{KmsError, KmsResult};
use crate::types::{KeyId, KeyMaterial, RECORD_SIZE};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;

/// Identifier-keyed storage for key material.
#[async_trait]
pub trait KeyMaterialStore: Send + Sync {
    /// Persists material under `id`, overwriting any existing record.
    async fn put(&self, id: &KeyId, material: &KeyMaterial) -> KmsResult<()>;

    /// Loads the material for `id`, or `None` if no record exists.
    async fn get(&self, id: &KeyId) -> KmsResult<Option<KeyMaterial>>;

    /// Removes the record for `id`. Returns whether a record existed.
    async fn delete(&self, id: &KeyId) -> KmsResult<bool>;
}

/// In-memory store for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryKeyStore {
    records: RwLock<HashMap<KeyId, KeyMaterial>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyMaterialStore for MemoryKeyStore {
    async fn put(&self, id: &KeyId, material: &KeyMaterial) -> KmsResult<()> {
        self.records
            .write()
            .await
            .insert(id.clone(), material.clone());
        Ok(())
    }

    async fn get(&self, id: &KeyId) -> KmsResult<Option<KeyMaterial>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &KeyId) -> KmsResult<bool> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}

/// Filesystem store: one 32-byte record file per identifier.
///
/// File names come from [`KeyId`]'s UUID rendering, so the directory never
/// sees caller-controlled path fragments.
pub struct FsKeyStore {
    dir: PathBuf,
}

impl FsKeyStore {
    /// Opens the store, creating the directory if it does not exist.
    pub async fn open(dir: impl Into<PathBuf>) -> KmsResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| KmsError::Persistence(format!("create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn record_path(&self, id: &KeyId) -> PathBuf {
        self.dir.join(id.to_string())
    }
}

#[async_trait]
impl KeyMaterialStore for FsKeyStore {
    async fn put(&self, id: &KeyId, material: &KeyMaterial) -> KmsResult<()> {
        fs::write(self.record_path(id), material.to_bytes())
            .await
            .map_err(|e| KmsError::Persistence(format!("write record {id}: {e}")))
    }

    async fn get(&self, id: &KeyId) -> KmsResult<Option<KeyMaterial>> {
        match fs::read(self.record_path(id)).await {
            Ok(bytes) => {
                let record: [u8; RECORD_SIZE] = bytes.as_slice().try_into().map_err(|_| {
                    KmsError::Persistence(format!(
                        "corrupt record {id}: expected {RECORD_SIZE} bytes, got {}",
                        bytes.len()
                    ))
                })?;
                Ok(Some(KeyMaterial::from_bytes(record)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KmsError::Persistence(format!("read record {id}: {e}"))),
        }
    }

    async fn delete(&self, id: &KeyId) -> KmsResult<bool> {
        match fs::remove_file(self.record_path(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(KmsError::Persistence(format!("delete record {id}: {e}"))),
        }
    }
}
