//! Vault encryption and decryption API.
//!
//! Orchestrates the KDF and the envelope codec over a vault entry.
//! Every operation is stateless: each call derives its own key
//! material and shares nothing with concurrent calls. Key derivation
//! is deliberately expensive, so it runs on the blocking thread pool
//! and operations for different users proceed concurrently.

use tracing::debug;

use crate::entry::VaultEntry;
use zerovault_common::{Error, Result, SecretBytes};
use zerovault_crypto::{derive_key, derive_key_with_fresh_salt, EncryptedEnvelope, KdfParams};

/// Encrypt a vault entry under the master password.
///
/// Uses the recommended KDF parameters. See [`encrypt_vault_with`].
pub async fn encrypt_vault(master_password: &[u8], entry: &VaultEntry) -> Result<EncryptedEnvelope> {
    encrypt_vault_with(master_password, entry, &KdfParams::default()).await
}

/// Encrypt a vault entry under the master password with explicit KDF
/// parameters.
///
/// A fresh random salt is generated for every call and recorded in the
/// envelope, so two encryptions of the same entry never share salt,
/// nonce, or ciphertext.
///
/// # Errors
/// - `InvalidEntry` if a required field is empty (checked before any
///   KDF work)
/// - `InvalidInput` / `InvalidParameters` from key derivation
pub async fn encrypt_vault_with(
    master_password: &[u8],
    entry: &VaultEntry,
    params: &KdfParams,
) -> Result<EncryptedEnvelope> {
    if !entry.is_valid() {
        return Err(Error::InvalidEntry(
            "site, username, and password must be non-empty".to_string(),
        ));
    }

    debug!("Encrypting vault entry");

    let password = SecretBytes::new(master_password.to_vec());
    let entry = entry.clone();
    let params = params.clone();

    let envelope = spawn_crypto(move || {
        let material = derive_key_with_fresh_salt(password.as_bytes(), &params)?;
        EncryptedEnvelope::seal(&entry, material.encryption_key(), material.salt())
    })
    .await?;

    debug!(ciphertext_len = envelope.ciphertext.len(), "Vault entry encrypted");
    Ok(envelope)
}

/// Decrypt an envelope back into a vault entry.
///
/// Uses the recommended KDF parameters. See [`decrypt_vault_with`].
pub async fn decrypt_vault(
    master_password: &[u8],
    envelope: &EncryptedEnvelope,
) -> Result<VaultEntry> {
    decrypt_vault_with(master_password, envelope, &KdfParams::default()).await
}

/// Decrypt an envelope back into a vault entry with explicit KDF
/// parameters.
///
/// Re-derives key material from the salt embedded in the envelope.
/// `params` must match the parameters the envelope was produced with;
/// the envelope pins the algorithms, parameters are deployment
/// configuration.
///
/// # Errors
/// - `DecryptionFailed` when the password is wrong or the envelope is
///   corrupt. A recoverable outcome that does not distinguish the two
/// - `UnsupportedAlgorithm` if the envelope tags are unknown
pub async fn decrypt_vault_with(
    master_password: &[u8],
    envelope: &EncryptedEnvelope,
    params: &KdfParams,
) -> Result<VaultEntry> {
    let salt = envelope.kdf_salt()?;

    debug!("Decrypting vault entry");

    let password = SecretBytes::new(master_password.to_vec());
    let envelope = envelope.clone();
    let params = params.clone();

    spawn_crypto(move || {
        let material = derive_key(password.as_bytes(), &salt, &params)?;
        envelope.open(material.encryption_key())
    })
    .await
}

/// Run a CPU-heavy crypto unit on the blocking pool.
async fn spawn_crypto<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Crypto(format!("Crypto task failed: {}", e)))?
}
