//! Vault entry model and encryption API for ZeroVault.
//!
//! The vault layer ties the KDF and the envelope codec together:
//! validate an entry, derive fresh key material, seal; or re-derive
//! from an envelope's salt and open. All plaintext stays on this side
//! of the collaborator boundary.

pub mod api;
pub mod entry;

pub use api::{decrypt_vault, decrypt_vault_with, encrypt_vault, encrypt_vault_with};
pub use entry::VaultEntry;
