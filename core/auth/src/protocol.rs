//! Challenge/response login protocol.
//!
//! The client proves knowledge of the master password without ever
//! transmitting it. At registration the client derives a verifier (a
//! one-way fingerprint of the KDF's authentication key) and hands
//! `(email, salt, verifier)` to the server. At login the client
//! re-derives the same material from the stored salt and computes
//! `proof = SHA-256(verifier || challenge)`; the server recomputes the
//! proof from its stored verifier and compares in constant time.
//!
//! This is the hash-based proof scheme, not a full PAKE: an attacker
//! who steals the verifier store can mount offline guesses against it.
//! Swapping in an SRP-style exchange would change only this module.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

use zerovault_common::{Email, Result};
use zerovault_crypto::{derive_key, derive_key_with_fresh_salt, DerivedKeyMaterial, KdfParams, Salt};

/// Serde adapter: fixed 32-byte values as base64 strings.
mod b64 {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = BASE64
            .decode(&encoded)
            .map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

/// One-way value derived from the master password, stored server-side.
///
/// Checking a login proof needs the verifier, never the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verifier(#[serde(with = "b64")] [u8; 32]);

impl Verifier {
    /// Derive the verifier from key material.
    pub fn derive(material: &DerivedKeyMaterial) -> Self {
        Self(material.auth_key().fingerprint())
    }

    /// All-zero stand-in hashed on the unknown-email path so the
    /// reject branch does the same work as the accept branch.
    pub(crate) fn dummy() -> Self {
        Self([0u8; 32])
    }

    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Verifier([REDACTED])")
    }
}

/// Random per-login challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge(#[serde(with = "b64")] [u8; 32]);

impl Challenge {
    /// Generate a fresh random challenge.
    pub fn generate() -> Self {
        use rand::Rng;
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the challenge bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Client-computed proof of password knowledge for one challenge.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginProof(#[serde(with = "b64")] [u8; 32]);

impl LoginProof {
    /// `SHA-256(verifier || challenge)`.
    ///
    /// Used by the client (from re-derived material) and the server
    /// (from the stored verifier); both sides must agree bit-for-bit.
    pub fn compute(verifier: &Verifier, challenge: &Challenge) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(verifier.as_bytes());
        hasher.update(challenge.as_bytes());
        let digest = hasher.finalize();

        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        Self(out)
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl fmt::Debug for LoginProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoginProof([REDACTED])")
    }
}

/// What the client hands to the auth-storage collaborator at
/// registration. Contains no password-equivalent material beyond the
/// one-way verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub email: Email,
    pub salt: Salt,
    pub verifier: Verifier,
}

/// Derive a registration record from the master password.
///
/// Generates a fresh salt; the password itself never leaves this
/// function.
pub fn register_account(
    email: Email,
    password: &[u8],
    params: &KdfParams,
) -> Result<RegistrationRecord> {
    let material = derive_key_with_fresh_salt(password, params)?;

    Ok(RegistrationRecord {
        email,
        salt: material.salt().clone(),
        verifier: Verifier::derive(&material),
    })
}

/// Recompute the login proof from the password, the stored salt, and a
/// challenge.
///
/// The wire sees only the resulting proof.
pub fn login_proof(
    password: &[u8],
    salt: &Salt,
    challenge: &Challenge,
    params: &KdfParams,
) -> Result<LoginProof> {
    let material = derive_key(password, salt, params)?;
    Ok(LoginProof::compute(&Verifier::derive(&material), challenge))
}
