//! Key management service for Sealbox.
//!
//! Generates and persists key material (a random secret plus a derivation
//! salt), derives service keys on demand, and serves them over HTTP:
//! - `POST /kms/generate-key`
//! - `GET /kms/retrieve-key/{key_id}`
//! - `DELETE /kms/delete-key/{key_id}`
//!
//! Raw key material never crosses the HTTP boundary; only the derived
//! service key does. Storage backends are pluggable via
//! [`KeyMaterialStore`].

pub mod error;
pub mod keystore;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;

pub use error::{KmsError, KmsResult};
pub use keystore::KeyStore;
pub use server::{create_server, run_server, start_background_server, KmsConfig};
pub use store::{FsKeyStore, KeyMaterialStore, MemoryKeyStore};
pub use types::{KeyId, KeyMaterial};
