//! Password-authenticated login for ZeroVault.
//!
//! This module provides:
//! - Client-side verifier derivation and challenge proofs
//! - Server-side proof verification and session tokens
//! - The auth-storage collaborator boundary
//!
//! The master password never crosses the wire; only salts, verifiers,
//! challenges, proofs, and opaque session tokens do.

pub mod protocol;
pub mod service;
pub mod store;
pub mod token;

pub use protocol::{
    login_proof, register_account, Challenge, LoginProof, RegistrationRecord, Verifier,
};
pub use service::AuthService;
pub use store::{AuthStore, MemoryAuthStore};
pub use token::{parse_bearer, SessionToken, TOKEN_BYTES};
