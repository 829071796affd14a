//! Cryptographic primitives for ZeroVault.
//!
//! This module provides:
//! - Key derivation using Argon2id, split into independent encryption
//!   and authentication keys
//! - Authenticated encryption using AES-256-GCM
//! - The self-describing ciphertext envelope
//! - Secure key management with automatic zeroization
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - No plaintext or key material is ever logged
//! - Raw key bytes are unreachable outside this crate

pub mod aead;
pub mod envelope;
pub mod kdf;
pub mod keys;

pub use envelope::{EncryptedEnvelope, AEAD_ALGORITHM, KDF_ALGORITHM};
pub use kdf::{derive_key, derive_key_with_fresh_salt, KdfParams};
pub use keys::{AuthKey, DerivedKeyMaterial, EncryptionKey, Salt, KEY_LENGTH, SALT_LENGTH};
