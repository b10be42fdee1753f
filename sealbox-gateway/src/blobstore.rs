//! Blob storage for encrypted envelopes.
//!
//! Backends store opaque bytes under flat object names. Envelope encryption
//! happens before `put` and after `get`, in
//! [`FileGateway`](crate::gateway::FileGateway); the store never sees
//! plaintext. Object names are validated before any backend touches them, so
//! a caller-supplied name can never leave the storage directory.

use crate::error::{GatewayError, GatewayResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;

/// Name-keyed storage for encrypted blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `name`, overwriting any existing object.
    async fn put(&self, name: &str, bytes: Vec<u8>) -> GatewayResult<()>;

    /// Loads the object stored under `name`.
    ///
    /// Fails with [`GatewayError::ObjectNotFound`] if no such object exists.
    async fn get(&self, name: &str) -> GatewayResult<Vec<u8>>;

    /// Lists all stored object names, sorted.
    async fn list(&self) -> GatewayResult<Vec<String>>;
}

/// Rejects object names that are empty or could escape the store: path
/// separators, traversal components, and the bare dot names.
pub(crate) fn validate_object_name(name: &str) -> GatewayResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(GatewayError::InvalidRequest(format!(
            "invalid object name: {name:?}"
        )));
    }
    Ok(())
}

/// In-memory store for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> GatewayResult<()> {
        validate_object_name(name)?;
        self.objects.write().await.insert(name.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, name: &str) -> GatewayResult<Vec<u8>> {
        validate_object_name(name)?;
        self.objects
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| GatewayError::ObjectNotFound(name.to_string()))
    }

    async fn list(&self) -> GatewayResult<Vec<String>> {
        Ok(self.objects.read().await.keys().cloned().collect())
    }
}

/// Filesystem store: one file per object in a flat directory.
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    /// Opens the store, creating the directory if it does not exist.
    pub async fn open(dir: impl Into<PathBuf>) -> GatewayResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| GatewayError::Storage(format!("create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn object_path(&self, name: &str) -> GatewayResult<PathBuf> {
        validate_object_name(name)?;
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> GatewayResult<()> {
        fs::write(self.object_path(name)?, bytes)
            .await
            .map_err(|e| GatewayError::Storage(format!("write object {name}: {e}")))
    }

    async fn get(&self, name: &str) -> GatewayResult<Vec<u8>> {
        match fs::read(self.object_path(name)?).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(GatewayError::ObjectNotFound(name.to_string()))
            }
            Err(e) => Err(GatewayError::Storage(format!("read object {name}: {e}"))),
        }
    }

    async fn list(&self) -> GatewayResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| GatewayError::Storage(format!("list {}: {e}", self.dir.display())))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| GatewayError::Storage(format!("list {}: {e}", self.dir.display())))?
        {
            let is_file = entry
                .file_type()
                .await
                .map_err(|e| GatewayError::Storage(format!("stat {:?}: {e}", entry.file_name())))?
                .is_file();
            if !is_file {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Name validation ──────────────────────────────────────────────

    #[test]
    fn rejects_traversal_and_separators() {
        for name in ["", ".", "..", "../secret", "a/b", "a\\b", "a..b"] {
            assert!(
                matches!(
                    validate_object_name(name),
                    Err(GatewayError::InvalidRequest(_))
                ),
                "{name:?} must be rejected"
            );
        }
    }

    #[test]
    fn accepts_plain_names() {
        for name in ["a.txt.enc", "report-2024.pdf.enc", "x"] {
            assert!(validate_object_name(name).is_ok(), "{name:?} must pass");
        }
    }

    // ── Memory backend ───────────────────────────────────────────────

    #[tokio::test]
    async fn memory_round_trip() {
        let store = MemoryBlobStore::new();
        store.put("a.enc", b"sealed".to_vec()).await.unwrap();
        assert_eq!(store.get("a.enc").await.unwrap(), b"sealed");
    }

    #[tokio::test]
    async fn memory_get_missing_is_not_found() {
        let store = MemoryBlobStore::new();
        let result = store.get("absent.enc").await;
        assert!(matches!(result, Err(GatewayError::ObjectNotFound(_))));
    }

    #[tokio::test]
    async fn memory_list_is_sorted() {
        let store = MemoryBlobStore::new();
        store.put("b.enc", vec![2]).await.unwrap();
        store.put("a.enc", vec![1]).await.unwrap();
        store.put("c.enc", vec![3]).await.unwrap();
        assert_eq!(store.list().await.unwrap(), ["a.enc", "b.enc", "c.enc"]);
    }

    #[tokio::test]
    async fn memory_put_overwrites() {
        let store = MemoryBlobStore::new();
        store.put("a.enc", b"old".to_vec()).await.unwrap();
        store.put("a.enc", b"new".to_vec()).await.unwrap();
        assert_eq!(store.get("a.enc").await.unwrap(), b"new");
    }

    // ── Filesystem backend ───────────────────────────────────────────

    #[tokio::test]
    async fn fs_round_trip_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();

        store.put("b.enc", b"two".to_vec()).await.unwrap();
        store.put("a.enc", b"one".to_vec()).await.unwrap();

        assert_eq!(store.get("a.enc").await.unwrap(), b"one");
        assert_eq!(store.list().await.unwrap(), ["a.enc", "b.enc"]);
    }

    #[tokio::test]
    async fn fs_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();
        let result = store.get("absent.enc").await;
        assert!(matches!(result, Err(GatewayError::ObjectNotFound(_))));
    }

    #[tokio::test]
    async fn fs_rejects_traversal_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();

        let put = store.put("../escape.enc", b"x".to_vec()).await;
        assert!(matches!(put, Err(GatewayError::InvalidRequest(_))));

        let get = store.get("../../etc/passwd").await;
        assert!(matches!(get, Err(GatewayError::InvalidRequest(_))));

        assert!(!dir.path().parent().unwrap().join("escape.enc").exists());
    }
}
