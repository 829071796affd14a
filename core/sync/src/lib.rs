//! Sync boundary for ZeroVault.
//!
//! Defines what crosses over to the external sync/storage
//! collaborator: encrypted envelopes wrapped in opaque ordering
//! metadata. The collaborator can store, order, and return records;
//! nothing in this crate lets it look inside one.

pub mod record;
pub mod store;

pub use record::SyncRecord;
pub use store::{MemorySyncStore, SyncStore};
