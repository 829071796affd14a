//! Session token issuance and bearer-header parsing.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use std::fmt;

use zerovault_common::{Error, Result};

/// Entropy per token. 32 random bytes encode to 43 characters of
/// unpadded base64url, well above the 20-character floor.
pub const TOKEN_BYTES: usize = 32;

/// Opaque bearer credential bound to an authenticated session.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Issue a fresh token from the process CSPRNG.
    pub fn issue() -> Self {
        use rand::Rng;
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Get the encoded token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render as an `Authorization` header value.
    pub fn to_bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken([REDACTED])")
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// Rejects an absent or malformed header before any lookup runs.
///
/// # Errors
/// - `InvalidInput` if the header is missing, lacks the `Bearer `
///   prefix, or the token part is empty or contains whitespace
pub fn parse_bearer(header: Option<&str>) -> Result<&str> {
    let header =
        header.ok_or_else(|| Error::InvalidInput("Missing Authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::InvalidInput("Malformed Authorization header".to_string()))?;

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(Error::InvalidInput(
            "Malformed Authorization header".to_string(),
        ));
    }

    Ok(token)
}
