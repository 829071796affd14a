//! Key derivation using Argon2id.
//!
//! Argon2id is a memory-hard password hashing function that provides
//! resistance to both GPU and time-memory trade-off attacks. A single
//! Argon2id pass produces a root hash which is expanded into two
//! independent keys (encryption, authentication) with domain-separated
//! BLAKE2b, so the two uses never share key material.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::keys::{AuthKey, DerivedKeyMaterial, EncryptionKey, Salt, KEY_LENGTH};
use zerovault_common::{Error, Result};

/// Domain label for the encryption subkey.
const ENCRYPTION_KEY_CONTEXT: &[u8] = b"zerovault/encryption-key/v1";

/// Domain label for the authentication subkey.
const AUTH_KEY_CONTEXT: &[u8] = b"zerovault/auth-key/v1";

/// Parameters for Argon2id key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB (e.g., 65536 = 64 MiB).
    pub memory_cost: u32,
    /// Number of iterations.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
    /// Length of the root hash in bytes.
    pub hash_length: usize,
}

impl KdfParams {
    /// Recommended parameters: 64 MiB, 4 iterations, 4 lanes.
    ///
    /// Sized to resist GPU/ASIC brute force while staying sub-second
    /// on commodity hardware.
    pub fn recommended() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 4,
            parallelism: 4,
            hash_length: KEY_LENGTH,
        }
    }

    /// Cheap parameters for tests. Not for production use.
    pub fn fast() -> Self {
        Self {
            memory_cost: 8192, // 8 MiB
            time_cost: 1,
            parallelism: 1,
            hash_length: KEY_LENGTH,
        }
    }

    /// Check that every parameter is in range.
    ///
    /// # Errors
    /// - `InvalidParameters` if any field is zero
    pub fn validate(&self) -> Result<()> {
        if self.memory_cost == 0 {
            return Err(Error::InvalidParameters("memory_cost must be > 0".to_string()));
        }
        if self.time_cost == 0 {
            return Err(Error::InvalidParameters("time_cost must be > 0".to_string()));
        }
        if self.parallelism == 0 {
            return Err(Error::InvalidParameters("parallelism must be > 0".to_string()));
        }
        if self.hash_length == 0 {
            return Err(Error::InvalidParameters("hash_length must be > 0".to_string()));
        }
        Ok(())
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::recommended()
    }
}

/// Derive encryption and authentication keys from a password and salt.
///
/// # Preconditions
/// - `password` must not be empty
/// - `params` must pass [`KdfParams::validate`]
///
/// # Postconditions
/// - Returns key material that is deterministic given the same inputs
/// - The encryption and auth keys are independent of each other
///
/// # Errors
/// - `InvalidInput` if the password is empty
/// - `InvalidParameters` if any KDF parameter is zero
///
/// # Security
/// - Password is not stored or logged
/// - The intermediate root hash is zeroized after expansion
pub fn derive_key(password: &[u8], salt: &Salt, params: &KdfParams) -> Result<DerivedKeyMaterial> {
    if password.is_empty() {
        return Err(Error::InvalidInput("Password cannot be empty".to_string()));
    }
    params.validate()?;

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(params.hash_length),
    )
    .map_err(|e| Error::InvalidParameters(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut root = Zeroizing::new(vec![0u8; params.hash_length]);
    argon2
        .hash_password_into(password, salt.as_bytes(), root.as_mut_slice())
        .map_err(|e| Error::Crypto(format!("Key derivation failed: {}", e)))?;

    let encryption_key = EncryptionKey::from_bytes(expand_subkey(&root, ENCRYPTION_KEY_CONTEXT));
    let auth_key = AuthKey::from_bytes(expand_subkey(&root, AUTH_KEY_CONTEXT));

    Ok(DerivedKeyMaterial::new(
        encryption_key,
        auth_key,
        salt.clone(),
    ))
}

/// Derive key material under a freshly generated random salt.
///
/// The salt is returned inside the material; the caller must persist
/// it to re-derive the same keys later.
pub fn derive_key_with_fresh_salt(password: &[u8], params: &KdfParams) -> Result<DerivedKeyMaterial> {
    let salt = Salt::generate();
    derive_key(password, &salt, params)
}

/// Expand the root hash into a 32-byte subkey with a context label.
fn expand_subkey(root: &[u8], context: &[u8]) -> [u8; KEY_LENGTH] {
    use blake2::digest::consts::U32;
    use blake2::{Blake2b, Digest};

    let mut hasher = Blake2b::<U32>::new();
    hasher.update(root);
    hasher.update(context);

    let result = hasher.finalize();
    let mut subkey = [0u8; KEY_LENGTH];
    subkey.copy_from_slice(&result);
    subkey
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aead;

    #[test]
    fn test_derive_key_deterministic() {
        let password = b"test-password-123";
        let salt = Salt::from_bytes([42u8; 16]);
        let params = KdfParams::fast();

        let material1 = derive_key(password, &salt, &params).unwrap();
        let material2 = derive_key(password, &salt, &params).unwrap();

        // Handles are opaque; check equality through behavior.
        let (nonce, ciphertext) = aead::encrypt(material1.encryption_key(), b"probe").unwrap();
        let plaintext = aead::decrypt(material2.encryption_key(), &nonce, &ciphertext).unwrap();
        assert_eq!(plaintext, b"probe");

        assert_eq!(
            material1.auth_key().fingerprint(),
            material2.auth_key().fingerprint()
        );
    }

    #[test]
    fn test_derive_key_different_password() {
        let salt = Salt::from_bytes([42u8; 16]);
        let params = KdfParams::fast();

        let material1 = derive_key(b"password1", &salt, &params).unwrap();
        let material2 = derive_key(b"password2", &salt, &params).unwrap();

        let (nonce, ciphertext) = aead::encrypt(material1.encryption_key(), b"probe").unwrap();
        assert!(aead::decrypt(material2.encryption_key(), &nonce, &ciphertext).is_err());
    }

    #[test]
    fn test_derive_key_different_salt() {
        let password = b"test-password-123";
        let params = KdfParams::fast();

        let material1 = derive_key(password, &Salt::from_bytes([1u8; 16]), &params).unwrap();
        let material2 = derive_key(password, &Salt::from_bytes([2u8; 16]), &params).unwrap();

        let (nonce, ciphertext) = aead::encrypt(material1.encryption_key(), b"probe").unwrap();
        assert!(aead::decrypt(material2.encryption_key(), &nonce, &ciphertext).is_err());
        assert_ne!(
            material1.auth_key().fingerprint(),
            material2.auth_key().fingerprint()
        );
    }

    #[test]
    fn test_encryption_and_auth_keys_are_independent() {
        let salt = Salt::from_bytes([42u8; 16]);
        let material = derive_key(b"password", &salt, &KdfParams::fast()).unwrap();

        // The auth fingerprint must not double as the encryption key.
        let (nonce, ciphertext) = aead::encrypt(material.encryption_key(), b"probe").unwrap();
        let fake_key = EncryptionKey::from_bytes(material.auth_key().fingerprint());
        assert!(aead::decrypt(&fake_key, &nonce, &ciphertext).is_err());
    }

    #[test]
    fn test_derive_key_empty_password_fails() {
        let salt = Salt::generate();
        let result = derive_key(b"", &salt, &KdfParams::fast());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_zero_parameters_rejected() {
        let salt = Salt::generate();
        for params in [
            KdfParams { memory_cost: 0, ..KdfParams::fast() },
            KdfParams { time_cost: 0, ..KdfParams::fast() },
            KdfParams { parallelism: 0, ..KdfParams::fast() },
            KdfParams { hash_length: 0, ..KdfParams::fast() },
        ] {
            let result = derive_key(b"password", &salt, &params);
            assert!(matches!(result, Err(Error::InvalidParameters(_))));
        }
    }

    #[test]
    fn test_fresh_salt_differs_per_call() {
        let params = KdfParams::fast();
        let material1 = derive_key_with_fresh_salt(b"password", &params).unwrap();
        let material2 = derive_key_with_fresh_salt(b"password", &params).unwrap();

        assert_ne!(material1.salt().as_bytes(), material2.salt().as_bytes());
    }

    #[test]
    fn test_recommended_params() {
        let params = KdfParams::default();
        assert_eq!(params.memory_cost, 65536);
        assert_eq!(params.time_cost, 4);
        assert_eq!(params.parallelism, 4);
        assert_eq!(params.hash_length, 32);
        assert!(params.validate().is_ok());
    }
}
