//! Credential sources
//!
//! A credential source hands out `(username, secret)` pairs keyed by a
//! registry identity string. Parsing real credential stores is left to the
//! embedding application; this module defines the seam plus two simple
//! sources.

use super::types::Credentials;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Credential-store key used for the public hub
pub const HUB_CREDENTIAL_KEY: &str = "https://index.docker.io/v1/";

/// Credential-store key used for the staging hub
pub const HUB_STAGE_CREDENTIAL_KEY: &str = "index-stage.docker.io";

/// Supplies credentials for a registry key
#[async_trait]
pub trait CredentialSource: Send + Sync + std::fmt::Debug {
    /// Credentials used to log in (password, PAT or identity token)
    async fn pull_credentials(&self, key: &str) -> Result<Credentials>;

    /// Pre-issued API access token, stored under `<key>/access-token`
    async fn access_token(&self, key: &str) -> Result<Credentials> {
        self.pull_credentials(&access_token_key(key)).await
    }
}

/// Key under which an access token for `key` is stored
pub fn access_token_key(key: &str) -> String {
    if key.ends_with('/') {
        format!("{key}access-token")
    } else {
        format!("{key}/access-token")
    }
}

/// Map an API host onto the key its credentials are stored under
pub fn credential_key_for_host(host: &str) -> String {
    match host {
        "hub.docker.com" => HUB_CREDENTIAL_KEY.to_string(),
        "hub-stage.docker.com" => HUB_STAGE_CREDENTIAL_KEY.to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// Static Credentials
// ============================================================================

/// In-memory credential source
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    entries: HashMap<String, Credentials>,
}

impl StaticCredentials {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Store credentials under `key`
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, credentials: Credentials) -> Self {
        self.entries.insert(key.into(), credentials);
        self
    }

    /// Store credentials under `key`
    pub fn insert(&mut self, key: impl Into<String>, credentials: Credentials) {
        self.entries.insert(key.into(), credentials);
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn pull_credentials(&self, key: &str) -> Result<Credentials> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| Error::source_unavailable(key, "no credentials stored"))
    }
}

// ============================================================================
// Environment Credentials
// ============================================================================

/// Reads a username and password from environment variables
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    username_var: String,
    password_var: String,
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::with_vars("DOCKER_USERNAME", "DOCKER_PASSWORD")
    }
}

impl EnvCredentials {
    /// Read `DOCKER_USERNAME` and `DOCKER_PASSWORD`
    pub fn new() -> Self {
        Self::default()
    }

    /// Read custom variable names
    pub fn with_vars(username_var: impl Into<String>, password_var: impl Into<String>) -> Self {
        Self {
            username_var: username_var.into(),
            password_var: password_var.into(),
        }
    }

    fn read(&self, var: &str) -> String {
        std::env::var(var).unwrap_or_default()
    }
}

#[async_trait]
impl CredentialSource for EnvCredentials {
    async fn pull_credentials(&self, key: &str) -> Result<Credentials> {
        let credentials = Credentials::new(self.read(&self.username_var), self.read(&self.password_var));
        if credentials.username.is_empty() && credentials.secret.is_empty() {
            return Err(Error::source_unavailable(
                key,
                format!("{} and {} are not set", self.username_var, self.password_var),
            ));
        }
        Ok(credentials)
    }

    async fn access_token(&self, key: &str) -> Result<Credentials> {
        Err(Error::source_unavailable(
            access_token_key(key),
            "environment does not hold access tokens",
        ))
    }
}

#[cfg(test)]
mod credential_tests {
    use super::*;

    #[test]
    fn test_access_token_key() {
        assert_eq!(
            access_token_key("https://index.docker.io/v1/"),
            "https://index.docker.io/v1/access-token"
        );
        assert_eq!(
            access_token_key("registry.example.com"),
            "registry.example.com/access-token"
        );
    }

    #[test]
    fn test_credential_key_for_host() {
        assert_eq!(credential_key_for_host("hub.docker.com"), HUB_CREDENTIAL_KEY);
        assert_eq!(
            credential_key_for_host("hub-stage.docker.com"),
            HUB_STAGE_CREDENTIAL_KEY
        );
        assert_eq!(
            credential_key_for_host("hub.internal:8443"),
            "hub.internal:8443"
        );
    }

    #[tokio::test]
    async fn test_static_credentials() {
        let source = StaticCredentials::new()
            .with("reg", Credentials::new("alice", "pw"))
            .with("reg/access-token", Credentials::new("alice", "jwt"));

        assert_eq!(source.pull_credentials("reg").await.unwrap().secret, "pw");
        assert_eq!(source.access_token("reg").await.unwrap().secret, "jwt");
        assert!(matches!(
            source.pull_credentials("other").await,
            Err(Error::TokenSourceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_env_credentials() {
        std::env::set_var("HUB_CLIENT_TEST_USER", "bob");
        std::env::set_var("HUB_CLIENT_TEST_PASS", "s3cret");
        let source = EnvCredentials::with_vars("HUB_CLIENT_TEST_USER", "HUB_CLIENT_TEST_PASS");

        let creds = source.pull_credentials("any").await.unwrap();
        assert_eq!(creds, Credentials::new("bob", "s3cret"));
        assert!(source.access_token("any").await.is_err());

        let unset = EnvCredentials::with_vars("HUB_CLIENT_UNSET_USER", "HUB_CLIENT_UNSET_PASS");
        assert!(unset.pull_credentials("any").await.is_err());
    }
}
