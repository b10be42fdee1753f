//! Envelope encryption core for Sealbox.
//!
//! Provides the two primitives everything else is built on:
//! - PBKDF2-HMAC-SHA256 key derivation from persisted `(secret, salt)` pairs
//! - AES-256-GCM envelope encryption with the fixed
//!   `salt ‖ nonce ‖ tag ‖ ciphertext` wire layout
//!
//! # Architecture
//!
//! Derivation happens twice, with different salts:
//!
//! 1. **Service key**: the key service derives `PBKDF2(secret, record_salt)`
//!    on every retrieval. Only the secret and salt are persisted; the 32-byte
//!    key is recomputed each time, so deleting the record revokes it.
//!
//! 2. **Data key**: each envelope carries its own fresh salt, and the codec
//!    derives `PBKDF2(service_key, envelope_salt)` per encrypt/decrypt. The
//!    service key never touches the cipher directly.
//!
//! This crate is pure computation: no I/O, no async, no shared state.
//! Encrypt and decrypt may run freely in parallel.

mod envelope;
mod error;
mod key;
mod padding;

pub use envelope::{decrypt, encrypt, HEADER_SIZE, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use key::{
    derive_key, generate_secret, DerivedKey, Salt, KEY_SIZE, PBKDF2_ROUNDS, SALT_SIZE, SECRET_SIZE,
};
