//! Key service error types.

use thiserror::Error;

/// Result type for key service operations.
pub type KmsResult<T> = Result<T, KmsError>;

/// Errors that can occur in the key lifecycle.
#[derive(Debug, Error)]
pub enum KmsError {
    /// The identifier names no record: never generated, or already deleted.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("key store error: {0}")]
    Persistence(String),
}
