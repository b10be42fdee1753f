//! Shared types for the key service.

use sealbox_crypto::{generate_secret, Salt, SALT_SIZE, SECRET_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use zeroize::ZeroizeOnDrop;

/// Persisted record length: secret followed by salt.
pub const RECORD_SIZE: usize = SECRET_SIZE + SALT_SIZE;

/// Opaque identifier for a key record.
///
/// Always a UUID. Route parameters parse into this type before they reach
/// the store, so an identifier can never carry a filesystem path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(Uuid);

impl KeyId {
    /// Mints a fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for KeyId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// The secret material of one key record: a 16-byte secret and the 16-byte
/// salt it is derived with. Persisted as the 32-byte concatenation; the
/// derived key itself is never stored.
///
/// Zeroized on drop. `Debug` is redacted.
#[derive(Clone, ZeroizeOnDrop)]
pub struct KeyMaterial {
    secret: [u8; SECRET_SIZE],
    salt: [u8; SALT_SIZE],
}

impl KeyMaterial {
    /// Draws fresh random secret and salt.
    pub fn generate() -> Self {
        Self {
            secret: generate_secret(),
            salt: *Salt::random().as_bytes(),
        }
    }

    pub fn secret(&self) -> &[u8; SECRET_SIZE] {
        &self.secret
    }

    pub fn salt(&self) -> Salt {
        Salt::from_bytes(self.salt)
    }

    /// Serializes to the on-disk record layout: `secret ‖ salt`.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        out[..SECRET_SIZE].copy_from_slice(&self.secret);
        out[SECRET_SIZE..].copy_from_slice(&self.salt);
        out
    }

    /// Reconstructs material from the on-disk record layout.
    pub fn from_bytes(bytes: [u8; RECORD_SIZE]) -> Self {
        let mut secret = [0u8; SECRET_SIZE];
        let mut salt = [0u8; SALT_SIZE];
        secret.copy_from_slice(&bytes[..SECRET_SIZE]);
        salt.copy_from_slice(&bytes[SECRET_SIZE..]);
        Self { secret, salt }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout_round_trips() {
        let material = KeyMaterial::generate();
        let bytes = material.to_bytes();
        assert_eq!(bytes.len(), 32);

        let restored = KeyMaterial::from_bytes(bytes);
        assert_eq!(restored.secret(), material.secret());
        assert_eq!(restored.salt(), material.salt());
    }

    #[test]
    fn key_id_parses_own_display() {
        let id = KeyId::generate();
        let parsed: KeyId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn key_id_rejects_non_uuid() {
        assert!("../../etc/passwd".parse::<KeyId>().is_err());
        assert!("not-a-uuid".parse::<KeyId>().is_err());
        assert!("".parse::<KeyId>().is_err());
    }

    #[test]
    fn key_material_debug_is_redacted() {
        let material = KeyMaterial::generate();
        assert_eq!(format!("{material:?}"), "KeyMaterial(..)");
    }
}
