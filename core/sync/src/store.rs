//! Sync-storage collaborator boundary.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::record::SyncRecord;
use zerovault_common::{Error, Result};

/// Storage boundary for encrypted vault states.
///
/// The collaborator sees only envelopes and opaque identifiers; it
/// never holds key material or plaintext. Within one `(user, device)`
/// vault, records are ordered by their caller-supplied version.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Persist a record.
    ///
    /// # Postconditions
    /// - The record is returned byte-identical by later pulls
    /// - Replaying the same `(version, nonce)` is a no-op
    ///
    /// # Errors
    /// - `InvalidInput` if the version already exists with a
    ///   different nonce
    /// - `StorageUnavailable` on backend failure
    async fn push(&self, record: SyncRecord) -> Result<()>;

    /// Records with `version > since_version` for the given vault,
    /// ascending by version.
    async fn pull(
        &self,
        user_id: &Uuid,
        device_id: &str,
        since_version: i64,
    ) -> Result<Vec<SyncRecord>>;
}

/// In-memory sync store for tests and host embedding.
pub struct MemorySyncStore {
    vaults: RwLock<HashMap<(Uuid, String), Vec<SyncRecord>>>,
}

impl MemorySyncStore {
    pub fn new() -> Self {
        Self {
            vaults: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemorySyncStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncStore for MemorySyncStore {
    async fn push(&self, record: SyncRecord) -> Result<()> {
        let mut vaults = self.vaults.write().await;
        let records = vaults
            .entry((record.user_id, record.device_id.clone()))
            .or_default();

        if let Some(existing) = records.iter().find(|r| r.version == record.version) {
            if existing.nonce == record.nonce {
                debug!(version = record.version, "Idempotent replay ignored");
                return Ok(());
            }
            return Err(Error::InvalidInput(format!(
                "Version {} already exists for this vault",
                record.version
            )));
        }

        debug!(version = record.version, "Record pushed");
        records.push(record);
        records.sort_by_key(|r| r.version);
        Ok(())
    }

    async fn pull(
        &self,
        user_id: &Uuid,
        device_id: &str,
        since_version: i64,
    ) -> Result<Vec<SyncRecord>> {
        let vaults = self.vaults.read().await;

        Ok(vaults
            .get(&(*user_id, device_id.to_string()))
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.version > since_version)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
