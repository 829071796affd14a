//! Sync record: an envelope plus the opaque identifiers the sync
//! collaborator orders it by.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use zerovault_crypto::EncryptedEnvelope;

/// One pushed vault state for a `(user, device)` pair.
///
/// The server persists this opaquely and returns it unmodified on
/// pull. `version` is the ordering key within a vault; `nonce` is an
/// application-level idempotency token and has nothing to do with the
/// AEAD iv inside the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub user_id: Uuid,
    pub device_id: String,
    pub version: i64,
    pub timestamp: i64,
    pub nonce: String,
    pub envelope: EncryptedEnvelope,
}

impl SyncRecord {
    /// Build a record stamped with the current time and a fresh
    /// idempotency nonce.
    pub fn new(
        user_id: Uuid,
        device_id: impl Into<String>,
        version: i64,
        envelope: EncryptedEnvelope,
    ) -> Self {
        Self {
            user_id,
            device_id: device_id.into(),
            version,
            timestamp: Utc::now().timestamp(),
            nonce: Uuid::new_v4().to_string(),
            envelope,
        }
    }
}
