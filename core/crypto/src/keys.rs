//! Key types with secure memory handling.
//!
//! All key types automatically zeroize their memory on drop to prevent
//! sensitive data from persisting in memory. Raw key bytes are only
//! reachable inside this crate; callers hold opaque handles.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use zerovault_common::{Error, Result};

/// Length of derived keys in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of KDF salts in bytes.
pub const SALT_LENGTH: usize = 16;

/// Key used for vault entry encryption.
///
/// The raw bytes are not exposed outside this crate. Use the AEAD
/// functions in [`crate::aead`] to operate with this key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    key: [u8; KEY_LENGTH],
}

impl EncryptionKey {
    pub(crate) fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionKey([REDACTED])")
    }
}

/// Key used for authentication material.
///
/// Independent from the encryption key even though both come from the
/// same password. The only public operation is a one-way fingerprint,
/// so the handle stays non-extractable.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AuthKey {
    key: [u8; KEY_LENGTH],
}

impl AuthKey {
    pub(crate) fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// One-way SHA-256 fingerprint of the key.
    ///
    /// This is the value the login protocol stores server-side as the
    /// verifier. The key bytes themselves cannot be recovered from it.
    pub fn fingerprint(&self) -> [u8; KEY_LENGTH] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(self.key);
        let digest = hasher.finalize();
        let mut out = [0u8; KEY_LENGTH];
        out.copy_from_slice(&digest);
        out
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthKey([REDACTED])")
    }
}

/// Salt for key derivation.
///
/// Salts are public wire data: they serialize as base64 strings and
/// travel inside envelopes and registration records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Generate a random salt.
    pub fn generate() -> Self {
        use rand::Rng;
        let mut salt = [0u8; SALT_LENGTH];
        rand::rng().fill_bytes(&mut salt);
        Self(salt)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, validating the length.
    ///
    /// # Errors
    /// - `InvalidSaltLength` if the slice is not exactly 16 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SALT_LENGTH {
            return Err(Error::InvalidSaltLength {
                expected: SALT_LENGTH,
                actual: bytes.len(),
            });
        }
        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(bytes);
        Ok(Self(salt))
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }

    /// Encode as base64.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Decode from base64, validating the length.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| Error::InvalidInput(format!("Invalid base64 salt: {}", e)))?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Salt {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// Key material derived from a master password.
///
/// Bundles the two independent key handles with the salt they were
/// derived under, so the caller can persist the salt for future
/// re-derivation. Never serialized as a whole: only the salt has a
/// wire form.
#[derive(Debug, Clone)]
pub struct DerivedKeyMaterial {
    encryption_key: EncryptionKey,
    auth_key: AuthKey,
    salt: Salt,
}

impl DerivedKeyMaterial {
    pub(crate) fn new(encryption_key: EncryptionKey, auth_key: AuthKey, salt: Salt) -> Self {
        Self {
            encryption_key,
            auth_key,
            salt,
        }
    }

    /// Key handle for envelope encryption.
    pub fn encryption_key(&self) -> &EncryptionKey {
        &self.encryption_key
    }

    /// Key handle for authentication material.
    pub fn auth_key(&self) -> &AuthKey {
        &self.auth_key
    }

    /// Salt this material was derived under.
    pub fn salt(&self) -> &Salt {
        &self.salt
    }
}
