//! Common types used throughout ZeroVault.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// Email address identifying an account.
///
/// Emails travel across the auth-storage boundary and are the lookup
/// key for salts and verifiers. Comparison is case-insensitive on the
/// domain side of real mail systems, but the protocol treats the
/// stored string as canonical: lookups use the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new Email from a string.
    ///
    /// # Preconditions
    /// - `address` must be non-empty and contain a single `@` with
    ///   non-empty local and domain parts
    ///
    /// # Errors
    /// - Returns error if the address is structurally invalid
    pub fn new(address: impl Into<String>) -> crate::Result<Self> {
        let address = address.into().trim().to_ascii_lowercase();
        if address.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Email cannot be empty".to_string(),
            ));
        }
        let mut parts = address.splitn(2, '@');
        let local = parts.next().unwrap_or("");
        let domain = parts.next().unwrap_or("");
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(crate::Error::InvalidInput(format!(
                "Malformed email address: {}",
                address
            )));
        }
        Ok(Self(address))
    }

    /// Get the normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sensitive byte buffer that zeroizes on drop.
///
/// Used for transient plaintext (serialized vault entries between
/// validation and encryption, and between decryption and parsing).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    /// Wrap a byte buffer.
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// Get a reference to the inner bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes([REDACTED; {} bytes])", self.0.len())
    }
}
