//! Authenticated encryption using AES-256-GCM.
//!
//! AES-256-GCM provides both confidentiality and authenticity with a
//! 12-byte nonce. Nonces are generated randomly for every call and a
//! nonce is never derived from content: reuse under the same key
//! breaks both confidentiality and integrity.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::keys::EncryptionKey;
use zerovault_common::{Error, Result};

/// Nonce size for AES-256-GCM (12 bytes).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Encrypt plaintext under the given key.
///
/// # Postconditions
/// - Returns the fresh random nonce and `ciphertext || tag`
/// - Two calls with identical inputs produce different nonces and
///   ciphertexts
///
/// # Errors
/// - `Crypto` if the cipher rejects the operation
pub fn encrypt(key: &EncryptionKey, plaintext: &[u8]) -> Result<([u8; NONCE_SIZE], Vec<u8>)> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| Error::Crypto(format!("Invalid key: {}", e)))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    nonce_bytes.copy_from_slice(nonce.as_slice());

    Ok((nonce_bytes, ciphertext))
}

/// Decrypt `ciphertext || tag` under the given key and nonce.
///
/// # Errors
/// - `DecryptionFailed` on a failed tag check, a wrong key, or a
///   truncated buffer. The error carries no detail about which of
///   these applied.
pub fn decrypt(key: &EncryptionKey, nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < TAG_SIZE {
        return Err(Error::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| Error::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| Error::DecryptionFailed)
}
