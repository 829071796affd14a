//! Self-describing ciphertext envelope.
//!
//! An envelope bundles the ciphertext with everything a future client
//! needs to decrypt it: the AEAD nonce, the KDF salt, and the fixed
//! algorithm tags. Field names are wire-stable; consumers reject
//! envelopes carrying algorithm combinations they do not support.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::aead::{self, NONCE_SIZE};
use crate::keys::{EncryptionKey, Salt, SALT_LENGTH};
use zerovault_common::{Error, Result};

/// Algorithm tag carried by every envelope.
pub const AEAD_ALGORITHM: &str = "AES-256-GCM";

/// Derivation algorithm tag carried by every envelope.
pub const KDF_ALGORITHM: &str = "Argon2id";

/// Encrypted, self-describing payload safe to store on an untrusted
/// server.
///
/// Wire format is JSON with exactly these field names:
/// `ciphertext`, `iv`, `salt`, `algorithm`, `derivationAlgorithm`.
/// The GCM authentication tag is appended to `ciphertext`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    /// Base64 `ciphertext || tag`.
    pub ciphertext: String,
    /// Base64 12-byte AEAD nonce.
    pub iv: String,
    /// Base64 16-byte KDF salt.
    pub salt: String,
    /// Always `"AES-256-GCM"`.
    pub algorithm: String,
    /// Always `"Argon2id"`.
    #[serde(rename = "derivationAlgorithm")]
    pub derivation_algorithm: String,
}

impl EncryptedEnvelope {
    /// Serialize a value and encrypt it into an envelope.
    ///
    /// # Postconditions
    /// - The envelope records the salt the key was derived under
    /// - A fresh nonce is used, so repeated seals of the same value
    ///   produce different envelopes
    ///
    /// # Errors
    /// - `Serialization` if the value cannot be encoded
    /// - `Crypto` if encryption fails
    pub fn seal<T: Serialize>(value: &T, key: &EncryptionKey, salt: &Salt) -> Result<Self> {
        let plaintext = Zeroizing::new(
            serde_json::to_vec(value).map_err(|e| Error::Serialization(e.to_string()))?,
        );

        let (nonce, ciphertext) = aead::encrypt(key, &plaintext)?;

        Ok(Self {
            ciphertext: BASE64.encode(ciphertext),
            iv: BASE64.encode(nonce),
            salt: salt.to_base64(),
            algorithm: AEAD_ALGORITHM.to_string(),
            derivation_algorithm: KDF_ALGORITHM.to_string(),
        })
    }

    /// Decrypt the envelope and deserialize the payload.
    ///
    /// # Errors
    /// - `UnsupportedAlgorithm` if either algorithm tag is unknown
    /// - `DecryptionFailed` on bad base64, wrong iv/salt length, a
    ///   failed tag check, or a wrong key, without distinguishing
    ///   which
    /// - `Serialization` if the authenticated plaintext does not parse
    pub fn open<T: DeserializeOwned>(&self, key: &EncryptionKey) -> Result<T> {
        if self.algorithm != AEAD_ALGORITHM {
            return Err(Error::UnsupportedAlgorithm(self.algorithm.clone()));
        }
        if self.derivation_algorithm != KDF_ALGORITHM {
            return Err(Error::UnsupportedAlgorithm(self.derivation_algorithm.clone()));
        }

        let iv = BASE64.decode(&self.iv).map_err(|_| Error::DecryptionFailed)?;
        if iv.len() != NONCE_SIZE {
            return Err(Error::DecryptionFailed);
        }
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&iv);

        let salt = BASE64.decode(&self.salt).map_err(|_| Error::DecryptionFailed)?;
        if salt.len() != SALT_LENGTH {
            return Err(Error::DecryptionFailed);
        }

        let ciphertext = BASE64
            .decode(&self.ciphertext)
            .map_err(|_| Error::DecryptionFailed)?;

        let plaintext = Zeroizing::new(aead::decrypt(key, &nonce, &ciphertext)?);

        serde_json::from_slice(&plaintext).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Salt to re-derive the key material from.
    ///
    /// # Errors
    /// - `DecryptionFailed` if the embedded salt is malformed (same
    ///   class as any other unusable envelope)
    pub fn kdf_salt(&self) -> Result<Salt> {
        let bytes = BASE64.decode(&self.salt).map_err(|_| Error::DecryptionFailed)?;
        Salt::from_slice(&bytes).map_err(|_| Error::DecryptionFailed)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KEY_LENGTH;
    use std::collections::BTreeMap;

    fn test_key(byte: u8) -> EncryptionKey {
        EncryptionKey::from_bytes([byte; KEY_LENGTH])
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let key = test_key(42);
        let salt = Salt::generate();
        let value: BTreeMap<String, String> =
            [("site".to_string(), "example.com".to_string())].into();

        let envelope = EncryptedEnvelope::seal(&value, &key, &salt).unwrap();
        let restored: BTreeMap<String, String> = envelope.open(&key).unwrap();

        assert_eq!(restored, value);
    }

    #[test]
    fn test_envelope_is_self_describing() {
        let envelope =
            EncryptedEnvelope::seal(&"payload", &test_key(1), &Salt::generate()).unwrap();

        assert_eq!(envelope.algorithm, "AES-256-GCM");
        assert_eq!(envelope.derivation_algorithm, "Argon2id");
    }

    #[test]
    fn test_iv_is_12_bytes() {
        let envelope =
            EncryptedEnvelope::seal(&"payload", &test_key(1), &Salt::generate()).unwrap();

        assert_eq!(BASE64.decode(&envelope.iv).unwrap().len(), 12);
    }

    #[test]
    fn test_salt_is_16_bytes_and_recoverable() {
        let salt = Salt::from_bytes([9u8; SALT_LENGTH]);
        let envelope = EncryptedEnvelope::seal(&"payload", &test_key(1), &salt).unwrap();

        assert_eq!(BASE64.decode(&envelope.salt).unwrap().len(), 16);
        assert_eq!(envelope.kdf_salt().unwrap(), salt);
    }

    #[test]
    fn test_wire_field_names() {
        let envelope =
            EncryptedEnvelope::seal(&"payload", &test_key(1), &Salt::generate()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&envelope.to_json().unwrap()).unwrap();

        for field in ["ciphertext", "iv", "salt", "algorithm", "derivationAlgorithm"] {
            assert!(json.get(field).is_some(), "missing wire field {field}");
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let envelope =
            EncryptedEnvelope::seal(&"payload", &test_key(1), &Salt::generate()).unwrap();
        let restored = EncryptedEnvelope::from_json(&envelope.to_json().unwrap()).unwrap();

        assert_eq!(restored, envelope);
    }

    #[test]
    fn test_wrong_key_fails() {
        let envelope =
            EncryptedEnvelope::seal(&"payload", &test_key(1), &Salt::generate()).unwrap();

        let result: Result<String> = envelope.open(&test_key(2));
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = test_key(1);
        let mut envelope = EncryptedEnvelope::seal(&"payload", &key, &Salt::generate()).unwrap();

        let mut raw = BASE64.decode(&envelope.ciphertext).unwrap();
        raw[0] ^= 0x01;
        envelope.ciphertext = BASE64.encode(raw);

        let result: Result<String> = envelope.open(&key);
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let key = test_key(1);
        let mut envelope = EncryptedEnvelope::seal(&"payload", &key, &Salt::generate()).unwrap();
        envelope.algorithm = "AES-128-CBC".to_string();

        let result: Result<String> = envelope.open(&key);
        assert!(matches!(result, Err(Error::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_unknown_derivation_algorithm_rejected() {
        let key = test_key(1);
        let mut envelope = EncryptedEnvelope::seal(&"payload", &key, &Salt::generate()).unwrap();
        envelope.derivation_algorithm = "PBKDF2".to_string();

        let result: Result<String> = envelope.open(&key);
        assert!(matches!(result, Err(Error::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_invalid_iv_length_fails_uniformly() {
        let key = test_key(1);
        let mut envelope = EncryptedEnvelope::seal(&"payload", &key, &Salt::generate()).unwrap();
        envelope.iv = BASE64.encode([0u8; 8]);

        let result: Result<String> = envelope.open(&key);
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_invalid_salt_length_fails_uniformly() {
        let key = test_key(1);
        let mut envelope = EncryptedEnvelope::seal(&"payload", &key, &Salt::generate()).unwrap();
        envelope.salt = BASE64.encode([0u8; 8]);

        let result: Result<String> = envelope.open(&key);
        assert!(matches!(result, Err(Error::DecryptionFailed)));
        assert!(matches!(envelope.kdf_salt(), Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_two_seals_differ() {
        let key = test_key(1);
        let salt = Salt::generate();

        let e1 = EncryptedEnvelope::seal(&"payload", &key, &salt).unwrap();
        let e2 = EncryptedEnvelope::seal(&"payload", &key, &salt).unwrap();

        assert_ne!(e1.ciphertext, e2.ciphertext);
        assert_ne!(e1.iv, e2.iv);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_seal_open_roundtrip(
                payload in proptest::collection::vec(any::<u8>(), 0..2048),
            ) {
                let key = test_key(7);
                let salt = Salt::from_bytes([3u8; SALT_LENGTH]);

                let envelope = EncryptedEnvelope::seal(&payload, &key, &salt).unwrap();
                let restored: Vec<u8> = envelope.open(&key).unwrap();

                prop_assert_eq!(restored, payload);
            }
        }
    }
}
