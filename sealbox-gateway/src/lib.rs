//! Encryption gateway for Sealbox.
//!
//! Accepts file uploads, envelope-encrypts them under a key resolved from
//! the key service by identifier, and persists the sealed envelopes in a
//! blob store as `<name>.enc`:
//! - `POST /encryption/upload?key_id=<uuid>` (multipart field `file`)
//! - `GET /encryption/download/{filename}?key_id=<uuid>`
//! - `GET /encryption/files`
//!
//! Key resolution is a fresh round trip on every request; nothing is
//! cached, so a deleted key stops working on the very next call. Blob
//! storage backends are pluggable via [`BlobStore`]; key resolution via
//! [`KeyResolver`].

pub mod blobstore;
pub mod config;
pub mod error;
pub mod gateway;
pub mod key_client;
pub mod routes;
pub mod server;

pub use blobstore::{BlobStore, FsBlobStore, MemoryBlobStore};
pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::{original_name, stored_name, FileGateway, ENCRYPTED_SUFFIX};
pub use key_client::{DirectKeyClient, HttpKeyClient, KeyResolver};
pub use server::{create_server, run_server, start_background_server};
