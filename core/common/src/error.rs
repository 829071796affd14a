//! Common error types for ZeroVault.

use thiserror::Error;

/// Top-level error type for ZeroVault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Cryptographic operation failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// A provided salt has the wrong length.
    #[error("Invalid salt length: expected {expected} bytes, got {actual}")]
    InvalidSaltLength { expected: usize, actual: usize },

    /// Key derivation parameters are out of range.
    #[error("Invalid KDF parameters: {0}")]
    InvalidParameters(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A vault entry failed validation.
    #[error("Invalid vault entry: {0}")]
    InvalidEntry(String),

    /// Decryption failed.
    ///
    /// Covers a failed authentication tag, a wrong key, and malformed
    /// iv/salt lengths. The message is deliberately uniform so callers
    /// cannot distinguish which check tripped.
    #[error("Decryption failed: incorrect password or corrupted data")]
    DecryptionFailed,

    /// Login proof verification failed.
    ///
    /// Unknown email and mismatched proof produce this same value.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// An account already exists for the given email.
    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    /// Envelope carries an algorithm tag this build does not support.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// An external storage collaborator failed.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
