//! Authenticated envelope encryption for stored files.
//!
//! Wire layout, fixed widths:
//!
//! ```text
//! salt (16) ‖ nonce (16) ‖ tag (16) ‖ ciphertext (padded length)
//! ```
//!
//! The caller's 32-byte key never touches the cipher directly. Every
//! [`encrypt`] call draws a fresh salt and derives a per-envelope data key,
//! `PBKDF2(key, salt)`; [`decrypt`] repeats that derivation from the salt in
//! the header. The salt is load-bearing: corrupting it diverges the data key
//! and fails authentication exactly like corrupting the ciphertext.
//!
//! Plaintext is PKCS#7-padded to 16-byte blocks before sealing. GCM itself
//! needs no padding; the framing is part of the format and is stripped after
//! the tag verifies. The cipher is AES-256-GCM with a 16-byte nonce and a
//! detached 16-byte tag, so no plaintext is produced unless the tag is valid.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{derive_key, DerivedKey, Salt, SALT_SIZE};
use crate::padding;
use aes_gcm::aead::consts::U16;
use aes_gcm::aead::AeadInPlace;
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, KeyInit, Nonce, Tag};
use rand::rngs::OsRng;
use rand::RngCore;

/// Nonce length in bytes.
pub const NONCE_SIZE: usize = 16;

/// Authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Fixed header length: salt, nonce, and tag. Ciphertext follows.
pub const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE;

/// AES-256-GCM parameterized for this format's 16-byte nonce field.
type EnvelopeCipher = AesGcm<Aes256, U16>;
type EnvelopeNonce = Nonce<U16>;

/// Encrypts `plaintext` under `key`, returning a self-contained envelope.
///
/// Salt and nonce are drawn fresh from the OS RNG on every call, so two
/// encryptions of the same plaintext under the same key never produce the
/// same envelope.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let salt = Salt::random();
    let data_key = derive_key(key.as_bytes(), &salt);

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = EnvelopeNonce::from(nonce_bytes);

    let cipher = EnvelopeCipher::new(data_key.as_bytes().into());
    let mut buf = padding::pad(plaintext);
    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", &mut buf)
        .map_err(|e| CryptoError::Encryption(format!("envelope seal failed: {e}")))?;

    let mut envelope = Vec::with_capacity(HEADER_SIZE + buf.len());
    envelope.extend_from_slice(salt.as_bytes());
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(tag.as_slice());
    envelope.extend_from_slice(&buf);
    Ok(envelope)
}

/// Decrypts an envelope produced by [`encrypt`].
///
/// Fails with [`CryptoError::DecryptionFailed`] on anything short of a fully
/// valid envelope: truncated input, wrong key, corrupted header or
/// ciphertext, bad padding. The causes are deliberately indistinguishable.
pub fn decrypt(key: &DerivedKey, envelope: &[u8]) -> CryptoResult<Vec<u8>> {
    if envelope.len() < HEADER_SIZE {
        return Err(CryptoError::DecryptionFailed);
    }

    let (salt_bytes, rest) = envelope.split_at(SALT_SIZE);
    let (nonce_bytes, rest) = rest.split_at(NONCE_SIZE);
    let (tag_bytes, ciphertext) = rest.split_at(TAG_SIZE);

    let mut salt_arr = [0u8; SALT_SIZE];
    salt_arr.copy_from_slice(salt_bytes);
    let data_key = derive_key(key.as_bytes(), &Salt::from_bytes(salt_arr));

    let cipher = EnvelopeCipher::new(data_key.as_bytes().into());
    let mut buf = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            EnvelopeNonce::from_slice(nonce_bytes),
            b"",
            &mut buf,
            Tag::from_slice(tag_bytes),
        )
        .map_err(|_| CryptoError::DecryptionFailed)?;

    let plaintext = padding::unpad(&buf).ok_or(CryptoError::DecryptionFailed)?;
    Ok(plaintext.to_vec())
}
