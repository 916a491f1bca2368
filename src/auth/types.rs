//! Credential and token types
//!
//! Tokens issued by the hub are JWTs. Their claims are decoded only to learn
//! the expiry; the signature is never checked, the token is exactly as
//! trustworthy as the TLS channel it arrived on.

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};

/// Username plus a secret (password, PAT or identity token)
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Password or token
    pub secret: String,
}

impl Credentials {
    /// Create a new credential pair
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Reject empty usernames or secrets
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::missing_credential("username"));
        }
        if self.secret.is_empty() {
            return Err(Error::missing_credential("secret"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Cached bearer token with its expiry
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The bearer token
    pub token: String,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Build a cache entry from a freshly issued JWT.
    ///
    /// Fails with [`Error::NoExpiry`] when the token carries no `exp` claim.
    pub fn from_jwt(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let expires_at = TokenClaims::decode(&token)?
            .expires_at()
            .ok_or(Error::NoExpiry)?;
        Ok(Self { token, expires_at })
    }

    /// A token expiring exactly at `now` is already unusable.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Unverified JWT claims
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Expiry (seconds since the epoch)
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued-at (seconds since the epoch)
    #[serde(default)]
    pub iat: Option<i64>,
    /// Subject
    #[serde(default)]
    pub sub: Option<String>,
    /// Issuer
    #[serde(default)]
    pub iss: Option<String>,
}

impl TokenClaims {
    /// Decode the claims segment of a compact JWT without verifying it
    pub fn decode(token: &str) -> Result<Self> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(Error::invalid_token("expected three dot-separated segments"));
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| Error::invalid_token(format!("claims are not base64url: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| Error::invalid_token(format!("claims are not a JSON object: {e}")))
    }

    /// Expiry as a timestamp, if present and representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Whether a token looks like a JWT that has not expired yet.
///
/// A heuristic for choosing between stored credentials, not a security check.
pub fn is_jwt_acceptable(token: &str, now: DateTime<Utc>) -> bool {
    TokenClaims::decode(token)
        .ok()
        .and_then(|claims| claims.expires_at())
        .is_some_and(|expires_at| now < expires_at)
}

// ============================================================================
// Clock
// ============================================================================

/// Source of the current time for expiry checks
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock, for deterministic expiry handling in tests
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `now`
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    /// Move the clock forward
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Jump to a specific instant
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
