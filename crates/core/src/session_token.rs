//! Admin session token generation and storage digests.
//!
//! The raw token is the client's capability: 32 random bytes, URL-safe base64
//! encoded, handed out once in a cookie and never persisted. The server stores
//! only [`TokenDigester::digest`] of it, an HMAC-SHA256 keyed by a server-side
//! pepper, so a read-only leak of the session table yields nothing replayable.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::error::CoreError;

/// Number of random bytes in a raw session token.
pub const TOKEN_BYTES: usize = 32;

/// Encoded length of a raw session token (unpadded base64 of 32 bytes).
pub const TOKEN_ENCODED_LEN: usize = 43;

type HmacSha256 = Hmac<Sha256>;

/// Generate a fresh raw session token.
///
/// Every call draws new bytes from the thread-local CSPRNG; nothing is cached.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Returns `true` if `token` has the shape of a token produced by
/// [`generate_session_token`].
///
/// Only a cheap pre-filter: a well-formed token still has to be found in the
/// session store.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_ENCODED_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Keyed digest of raw session tokens.
///
/// Deterministic for a given pepper, so the same token resolves to the same
/// stored row across restarts. Rotating the pepper invalidates every session.
#[derive(Clone)]
pub struct TokenDigester {
    mac: HmacSha256,
}

impl TokenDigester {
    /// Build a digester keyed by `pepper`. Rejects an empty pepper.
    pub fn new(pepper: &str) -> Result<Self, CoreError> {
        if pepper.is_empty() {
            return Err(CoreError::Validation(
                "session pepper must not be empty".into(),
            ));
        }
        let mac = HmacSha256::new_from_slice(pepper.as_bytes())
            .map_err(|e| CoreError::Internal(format!("HMAC key setup failed: {e}")))?;
        Ok(Self { mac })
    }

    /// Lowercase hex HMAC-SHA256 of the raw token (64 chars).
    pub fn digest(&self, raw_token: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(raw_token.as_bytes());
        format!("{:x}", mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for TokenDigester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDigester")
            .field("pepper", &"[REDACTED]")
            .finish()
    }
}
