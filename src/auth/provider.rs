//! Token providers
//!
//! A [`TokenProvider`] hands the transport a bearer token that is valid right
//! now. Two implementations exist:
//!
//! - [`LoginTokenProvider`] exchanges a username/password for a short-lived
//!   JWT and caches it until its `exp` claim.
//! - [`AccessTokenProvider`] re-reads a pre-issued token from a
//!   [`CredentialSource`] on every call, since the source may rotate it.

use super::credentials::CredentialSource;
use super::types::{is_jwt_acceptable, CachedToken, Clock, Credentials, SystemClock};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Produces a currently valid bearer token
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a valid token, refreshing it if necessary
    async fn ensure_token(&self) -> Result<String>;

    /// Account the tokens belong to (for display purposes)
    fn identity(&self) -> String;
}

// ============================================================================
// Login Token Provider
// ============================================================================

/// Logs in with a username/password and caches the issued token
pub struct LoginTokenProvider {
    credentials: Credentials,
    login_url: String,
    http_client: Client,
    clock: Arc<dyn Clock>,
    cached_token: RwLock<Option<CachedToken>>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

impl LoginTokenProvider {
    /// Create a provider logging in against `{base_url}/users/login`
    pub fn new(credentials: Credentials, base_url: &str) -> Result<Self> {
        let http_client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self::with_client(credentials, base_url, http_client))
    }

    /// Create a provider sharing an existing HTTP client
    pub fn with_client(credentials: Credentials, base_url: &str, http_client: Client) -> Self {
        Self {
            credentials,
            login_url: format!("{}/users/login", base_url.trim_end_matches('/')),
            http_client,
            clock: Arc::new(SystemClock),
            cached_token: RwLock::new(None),
        }
    }

    /// Read pull credentials for `key` from a credential source
    pub async fn from_source(
        source: &dyn CredentialSource,
        key: &str,
        base_url: &str,
        http_client: Client,
    ) -> Result<Self> {
        let credentials = source.pull_credentials(key).await?;
        credentials.validate()?;
        Ok(Self::with_client(credentials, base_url, http_client))
    }

    /// Use a custom clock for expiry checks
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Expiry of the cached token, if any
    pub async fn cached_expiry(&self) -> Option<DateTime<Utc>> {
        self.cached_token.read().await.as_ref().map(|t| t.expires_at)
    }

    /// Drop the cached token, forcing a login on the next call
    pub async fn clear_cache(&self) {
        *self.cached_token.write().await = None;
    }

    async fn login(&self) -> Result<CachedToken> {
        info!(username = %self.credentials.username, "Logging in to hub");

        let response = self
            .http_client
            .post(&self.login_url)
            .json(&LoginRequest {
                username: &self.credentials.username,
                password: &self.credentials.secret,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::LoginFailed {
                status: status.as_u16(),
                body,
            });
        }

        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| Error::decode(&self.login_url, e.to_string()))?;
        let token = CachedToken::from_jwt(login.token)?;
        debug!(expires_at = %token.expires_at, "Login token issued");
        Ok(token)
    }
}

#[async_trait]
impl TokenProvider for LoginTokenProvider {
    async fn ensure_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.is_valid_at(self.clock.now()) {
                    return Ok(token.token.clone());
                }
            }
        }

        // Writers queue here, so only one login is in flight at a time.
        let mut cached = self.cached_token.write().await;

        // Another caller may have refreshed while we waited.
        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(self.clock.now()) {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.login().await?;
        let token = new_token.token.clone();
        *cached = Some(new_token);
        Ok(token)
    }

    fn identity(&self) -> String {
        self.credentials.username.clone()
    }
}

impl std::fmt::Debug for LoginTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginTokenProvider")
            .field("username", &self.credentials.username)
            .field("login_url", &self.login_url)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Access Token Provider
// ============================================================================

/// Serves pre-issued access tokens straight from a credential source
#[derive(Debug)]
pub struct AccessTokenProvider {
    source: Arc<dyn CredentialSource>,
    key: String,
    clock: Arc<dyn Clock>,
    last_identity: Mutex<String>,
}

impl AccessTokenProvider {
    /// Create a provider reading the access token stored for `key`
    pub fn new(source: Arc<dyn CredentialSource>, key: impl Into<String>) -> Self {
        Self {
            source,
            key: key.into(),
            clock: Arc::new(SystemClock),
            last_identity: Mutex::new(String::new()),
        }
    }

    /// Create a provider, failing early if no usable token is stored
    pub async fn from_source(source: Arc<dyn CredentialSource>, key: impl Into<String>) -> Result<Self> {
        let provider = Self::new(source, key);
        provider.ensure_token().await?;
        Ok(provider)
    }

    /// Use a custom clock for expiry checks
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl TokenProvider for AccessTokenProvider {
    async fn ensure_token(&self) -> Result<String> {
        let credentials = self
            .source
            .access_token(&self.key)
            .await
            .map_err(|e| match e {
                unavailable @ Error::TokenSourceUnavailable { .. } => unavailable,
                other => Error::source_unavailable(&self.key, other.to_string()),
            })?;

        if !is_jwt_acceptable(&credentials.secret, self.clock.now()) {
            return Err(Error::source_unavailable(
                &self.key,
                "stored access token is missing, malformed or expired",
            ));
        }

        *self
            .last_identity
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = credentials.username;
        Ok(credentials.secret)
    }

    fn identity(&self) -> String {
        self.last_identity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// ============================================================================
// Token Source
// ============================================================================

/// How a client obtains its tokens, chosen once at construction time
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// Log in with a username and password
    Login(Credentials),
    /// Use the access token stored under `key`
    AccessToken {
        /// Credential source holding the token
        source: Arc<dyn CredentialSource>,
        /// Registry key the token is stored under
        key: String,
    },
}

impl TokenSource {
    /// Build the matching provider
    pub fn into_provider(
        self,
        base_url: &str,
        http_client: Client,
        clock: Arc<dyn Clock>,
    ) -> Result<Arc<dyn TokenProvider>> {
        Ok(match self {
            TokenSource::Login(credentials) => {
                credentials.validate()?;
                Arc::new(
                    LoginTokenProvider::with_client(credentials, base_url, http_client)
                        .with_clock(clock),
                )
            }
            TokenSource::AccessToken { source, key } => {
                Arc::new(AccessTokenProvider::new(source, key).with_clock(clock))
            }
        })
    }
}
