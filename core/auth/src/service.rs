//! Server-side authentication service.
//!
//! Verifies login proofs against stored verifiers and manages session
//! tokens. The service never sees a password: it works entirely from
//! `(salt, verifier)` records and challenge proofs.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::protocol::{Challenge, LoginProof, RegistrationRecord, Verifier};
use crate::store::AuthStore;
use crate::token::{parse_bearer, SessionToken};
use zerovault_common::{Email, Error, Result};
use zerovault_crypto::Salt;

/// Authentication service over a pluggable account store.
pub struct AuthService {
    store: Arc<dyn AuthStore>,
    sessions: RwLock<HashMap<String, Email>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// - `DuplicateAccount` if the email already exists
    /// - `StorageUnavailable` on store failure
    pub async fn register(&self, record: RegistrationRecord) -> Result<()> {
        let email = record.email.clone();
        self.store.create_account(record).await?;
        info!(email = %email, "Account registered");
        Ok(())
    }

    /// Salt lookup for login step 1.
    ///
    /// Returns `None` for an unknown email; the response shape reveals
    /// nothing else about account existence.
    pub async fn get_salt(&self, email: &Email) -> Result<Option<Salt>> {
        self.store.fetch_salt(email).await
    }

    /// Verify a login proof and issue a session token.
    ///
    /// Unknown email and mismatched proof both fail with the same
    /// `AuthenticationFailed`. The unknown-email path still computes a
    /// proof over a dummy verifier so both rejects do comparable work,
    /// and the comparison itself is constant-time.
    pub async fn authenticate(
        &self,
        email: &Email,
        challenge: &Challenge,
        proof: &LoginProof,
    ) -> Result<SessionToken> {
        let stored = self.store.fetch_verifier(email).await?;

        let (verifier, known) = match stored {
            Some(verifier) => (verifier, true),
            None => (Verifier::dummy(), false),
        };

        let expected = LoginProof::compute(&verifier, challenge);
        let matched = expected.ct_eq(proof);

        if !(known && matched) {
            debug!("Login rejected");
            return Err(Error::AuthenticationFailed);
        }

        let mut sessions = self.sessions.write().await;
        let token = loop {
            let candidate = SessionToken::issue();
            if !sessions.contains_key(candidate.as_str()) {
                break candidate;
            }
        };
        sessions.insert(token.as_str().to_string(), email.clone());

        info!(email = %email, "Login succeeded");
        Ok(token)
    }

    /// Resolve a bearer header to the authenticated identity.
    ///
    /// # Errors
    /// - `InvalidInput` for an absent/malformed header (rejected
    ///   before any session lookup)
    /// - `AuthenticationFailed` for an unknown or revoked token
    pub async fn validate_bearer(&self, header: Option<&str>) -> Result<Email> {
        let token = parse_bearer(header)?;

        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .cloned()
            .ok_or(Error::AuthenticationFailed)
    }

    /// Invalidate a session token. Unknown tokens are a no-op.
    pub async fn revoke(&self, token: &SessionToken) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(token.as_str()).is_some() {
            debug!("Session revoked");
        }
    }
}
