//! Vault entry model and validation.
//!
//! A vault entry is the plaintext record for one credential. It exists
//! only on the client, transiently: constructed before encryption,
//! recovered after decryption.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Plaintext credential record.
///
/// `site`, `username`, and `password` are required; `metadata` is an
/// optional free-form map this layer does not interpret. The map is
/// ordered by key, so serialized form does not depend on insertion
/// order.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultEntry {
    pub site: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl VaultEntry {
    /// Construct an entry without metadata. Pure; no validation.
    pub fn new(
        site: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            site: site.into(),
            username: username.into(),
            password: password.into(),
            metadata: None,
        }
    }

    /// Attach one metadata entry, creating the map if needed.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value);
        self
    }

    /// Check the required-field invariant.
    ///
    /// Returns false if `site`, `username`, or `password` is empty.
    /// Metadata is never validated.
    pub fn is_valid(&self) -> bool {
        !self.site.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for VaultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultEntry")
            .field("site", &self.site)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field(
                "metadata",
                &self.metadata.as_ref().map(|m| m.keys().collect::<Vec<_>>()),
            )
            .finish()
    }
}
