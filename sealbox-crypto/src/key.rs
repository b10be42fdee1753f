//! Key material and derivation.
//!
//! Keys are never persisted in derived form: the key service stores a
//! 16-byte secret and a 16-byte salt, and every retrieval recomputes
//! `PBKDF2-HMAC-SHA256(secret, salt)`. The same derivation runs once more
//! per envelope with the envelope's own salt (see [`crate::envelope`]).

use crate::error::{CryptoError, CryptoResult};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Derived key length in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Salt length in bytes.
pub const SALT_SIZE: usize = 16;

/// Stored secret length in bytes.
pub const SECRET_SIZE: usize = 16;

/// PBKDF2 rounds applied by [`derive_key`].
///
/// Part of the format contract: changing it orphans every persisted key
/// record and every existing envelope. Inputs are full-entropy machine
/// secrets, not passwords, which is why the count stays low enough to
/// re-derive on every call.
pub const PBKDF2_ROUNDS: u32 = 1_000;

/// Random salt for key derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Generates a fresh random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// A 32-byte symmetric key produced by [`derive_key`].
///
/// Zeroized on drop. `Debug` is redacted so keys cannot leak through logs.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Builds a key from a slice, rejecting any length other than 32.
    pub fn try_from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Generates a fresh random 16-byte secret for a new key record.
pub fn generate_secret() -> [u8; SECRET_SIZE] {
    let mut bytes = [0u8; SECRET_SIZE];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Derives a 32-byte key from input key material and a salt.
///
/// Deterministic: the same `(ikm, salt)` pair always yields the same key,
/// across calls and process restarts.
pub fn derive_key(ikm: &[u8], salt: &Salt) -> DerivedKey {
    let mut out = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(ikm, salt.as_bytes(), PBKDF2_ROUNDS, &mut out);
    DerivedKey(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let secret = generate_secret();
        let salt = Salt::random();
        let a = derive_key(&secret, &salt);
        let b = derive_key(&secret, &salt);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn different_salts_derive_different_keys() {
        let secret = generate_secret();
        let a = derive_key(&secret, &Salt::random());
        let b = derive_key(&secret, &Salt::random());
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn try_from_slice_rejects_wrong_length() {
        let err = DerivedKey::try_from_slice(&[0u8; 31]).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 31
            }
        ));
    }

    #[test]
    fn derived_key_debug_is_redacted() {
        let key = derive_key(b"secret", &Salt::random());
        assert_eq!(format!("{key:?}"), "DerivedKey(..)");
    }
}
