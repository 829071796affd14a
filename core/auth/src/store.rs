//! Auth-storage collaborator boundary.
//!
//! The server-side store holds `(email, salt, verifier)` triples. The
//! core never hands it a password or any plaintext. Implementations
//! must enforce email uniqueness and surface their own failures as
//! `StorageUnavailable`.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::protocol::{RegistrationRecord, Verifier};
use zerovault_common::{Email, Error, Result};
use zerovault_crypto::Salt;

/// Storage boundary for account records.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Persist a new account.
    ///
    /// # Postconditions
    /// - The record is retrievable by email
    ///
    /// # Errors
    /// - `DuplicateAccount` if the email is already registered
    /// - `StorageUnavailable` on backend failure
    async fn create_account(&self, record: RegistrationRecord) -> Result<()>;

    /// Salt for the given email, or `None` if unknown.
    ///
    /// Reveals nothing else about whether the account exists.
    async fn fetch_salt(&self, email: &Email) -> Result<Option<Salt>>;

    /// Stored verifier for the given email, or `None` if unknown.
    async fn fetch_verifier(&self, email: &Email) -> Result<Option<Verifier>>;
}

/// In-memory auth store for tests and host embedding.
pub struct MemoryAuthStore {
    accounts: RwLock<HashMap<Email, RegistrationRecord>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Number of registered accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

impl Default for MemoryAuthStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn create_account(&self, record: RegistrationRecord) -> Result<()> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&record.email) {
            return Err(Error::DuplicateAccount(record.email.to_string()));
        }

        accounts.insert(record.email.clone(), record);
        Ok(())
    }

    async fn fetch_salt(&self, email: &Email) -> Result<Option<Salt>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(email).map(|r| r.salt.clone()))
    }

    async fn fetch_verifier(&self, email: &Email) -> Result<Option<Verifier>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(email).map(|r| r.verifier.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::register_account;
    use zerovault_crypto::KdfParams;

    fn record(email: &str) -> RegistrationRecord {
        register_account(Email::new(email).unwrap(), b"password", &KdfParams::fast()).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let store = MemoryAuthStore::new();
        let record = record("a@x.com");
        let email = record.email.clone();
        let salt = record.salt.clone();

        store.create_account(record).await.unwrap();

        assert_eq!(store.fetch_salt(&email).await.unwrap(), Some(salt));
        assert!(store.fetch_verifier(&email).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryAuthStore::new();

        store.create_account(record("a@x.com")).await.unwrap();
        let result = store.create_account(record("a@x.com")).await;

        assert!(matches!(result, Err(Error::DuplicateAccount(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_email_is_none() {
        let store = MemoryAuthStore::new();
        let unknown = Email::new("nobody@x.com").unwrap();

        assert_eq!(store.fetch_salt(&unknown).await.unwrap(), None);
        assert!(store.fetch_verifier(&unknown).await.unwrap().is_none());
    }
}
