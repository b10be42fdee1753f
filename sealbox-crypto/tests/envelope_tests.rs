//! Envelope codec tests: round-trips, wire layout, and failure behavior
//! under tampering, truncation, and wrong keys.

use pretty_assertions::assert_eq;
use sealbox_crypto::{
    decrypt, derive_key, encrypt, generate_secret, CryptoError, DerivedKey, Salt, HEADER_SIZE,
    NONCE_SIZE, SALT_SIZE, TAG_SIZE,
};

fn test_key() -> DerivedKey {
    derive_key(&generate_secret(), &Salt::random())
}

// --- Round trips ---

#[test]
fn round_trip_small_payload() {
    let key = test_key();
    let envelope = encrypt(&key, b"hello world").unwrap();
    let plaintext = decrypt(&key, &envelope).unwrap();
    assert_eq!(plaintext, b"hello world");
}

#[test]
fn round_trip_empty_payload() {
    let key = test_key();
    let envelope = encrypt(&key, b"").unwrap();
    let plaintext = decrypt(&key, &envelope).unwrap();
    assert!(plaintext.is_empty());
}

#[test]
fn round_trip_exact_block_multiple() {
    let key = test_key();
    let data = vec![0x42u8; 64];
    let envelope = encrypt(&key, &data).unwrap();
    assert_eq!(decrypt(&key, &envelope).unwrap(), data);
}

#[test]
fn round_trip_large_payload() {
    let key = test_key();
    let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let envelope = encrypt(&key, &data).unwrap();
    assert_eq!(decrypt(&key, &envelope).unwrap(), data);
}

// --- Wire layout ---

#[test]
fn header_is_48_bytes_and_ciphertext_is_padded_length() {
    let key = test_key();
    assert_eq!(HEADER_SIZE, 48);

    // 11 bytes of plaintext pad to one 16-byte block
    let envelope = encrypt(&key, b"hello world").unwrap();
    assert_eq!(envelope.len(), HEADER_SIZE + 16);

    // a full block gains a whole block of padding
    let envelope = encrypt(&key, &[0u8; 16]).unwrap();
    assert_eq!(envelope.len(), HEADER_SIZE + 32);
}

#[test]
fn fresh_salt_and_nonce_per_call() {
    let key = test_key();
    let a = encrypt(&key, b"same plaintext").unwrap();
    let b = encrypt(&key, b"same plaintext").unwrap();

    assert_ne!(a, b);
    assert_ne!(a[..SALT_SIZE], b[..SALT_SIZE], "salts must differ");
    assert_ne!(
        a[SALT_SIZE..SALT_SIZE + NONCE_SIZE],
        b[SALT_SIZE..SALT_SIZE + NONCE_SIZE],
        "nonces must differ"
    );

    // both still decrypt
    assert_eq!(decrypt(&key, &a).unwrap(), b"same plaintext");
    assert_eq!(decrypt(&key, &b).unwrap(), b"same plaintext");
}

// --- Failure behavior ---

#[test]
fn flipping_any_byte_fails_decryption() {
    let key = test_key();
    let envelope = encrypt(&key, b"tamper target").unwrap();

    // Covers salt, nonce, tag, and ciphertext regions. The salt flips prove
    // the header salt participates in key derivation.
    for i in 0..envelope.len() {
        let mut tampered = envelope.clone();
        tampered[i] ^= 0x01;
        let result = decrypt(&key, &tampered);
        assert!(
            matches!(result, Err(CryptoError::DecryptionFailed)),
            "byte {i} flipped but decryption did not fail"
        );
    }
}

#[test]
fn corrupted_salt_region_alone_fails() {
    let key = test_key();
    let mut envelope = encrypt(&key, b"salt is load-bearing").unwrap();
    envelope[0] ^= 0xFF;
    assert!(matches!(
        decrypt(&key, &envelope),
        Err(CryptoError::DecryptionFailed)
    ));
}

#[test]
fn corrupted_tag_region_fails() {
    let key = test_key();
    let mut envelope = encrypt(&key, b"tag check").unwrap();
    envelope[SALT_SIZE + NONCE_SIZE] ^= 0xFF;
    assert!(matches!(
        decrypt(&key, &envelope),
        Err(CryptoError::DecryptionFailed)
    ));
}

#[test]
fn wrong_key_fails_decryption() {
    let k1 = test_key();
    let k2 = test_key();
    let envelope = encrypt(&k1, b"for k1 only").unwrap();
    assert!(matches!(
        decrypt(&k2, &envelope),
        Err(CryptoError::DecryptionFailed)
    ));
}

#[test]
fn truncated_envelope_fails() {
    let key = test_key();
    let envelope = encrypt(&key, b"will be truncated").unwrap();

    for len in [0, 1, 40, HEADER_SIZE - 1] {
        let result = decrypt(&key, &envelope[..len]);
        assert!(
            matches!(result, Err(CryptoError::DecryptionFailed)),
            "length {len} must fail"
        );
    }
}

#[test]
fn header_only_envelope_fails() {
    let key = test_key();
    let envelope = encrypt(&key, b"x").unwrap();
    // exactly 48 bytes: header intact, ciphertext gone
    assert!(matches!(
        decrypt(&key, &envelope[..HEADER_SIZE]),
        Err(CryptoError::DecryptionFailed)
    ));
}

#[test]
fn tag_size_matches_format() {
    assert_eq!(TAG_SIZE, 16);
    assert_eq!(NONCE_SIZE, 16);
    assert_eq!(SALT_SIZE, 16);
}

// Property-based tests
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn encrypt_decrypt_always_roundtrips(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let key = test_key();
            let envelope = encrypt(&key, &data).unwrap();
            let recovered = decrypt(&key, &envelope).unwrap();
            prop_assert_eq!(recovered, data);
        }

        #[test]
        fn any_single_byte_flip_fails(
            data in proptest::collection::vec(any::<u8>(), 1..128),
            pos_seed in any::<usize>(),
            mask in 1u8..=255,
        ) {
            let key = test_key();
            let mut envelope = encrypt(&key, &data).unwrap();
            let pos = pos_seed % envelope.len();
            envelope[pos] ^= mask;
            prop_assert!(decrypt(&key, &envelope).is_err());
        }
    }
}
