//! Gateway error types.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur in the encryption gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The key identifier names no record at the key service.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// No stored object under the requested name.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// Single failure signal for every decryption problem: short envelope,
    /// bad tag, bad padding, wrong key. Callers cannot tell the causes apart.
    #[error("decryption failed (wrong key or tampered envelope)")]
    DecryptionFailed,

    #[error("envelope encryption failed: {0}")]
    Encryption(String),

    #[error("blob storage error: {0}")]
    Storage(String),

    /// The key-resolution round trip could not complete.
    #[error("key service unavailable: {0}")]
    KeyServiceUnavailable(String),

    /// The key service answered, but not with a usable key.
    #[error("key service error: {0}")]
    KeyService(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
