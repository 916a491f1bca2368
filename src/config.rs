//! Client configuration
//!
//! [`HubConfig`] is loaded from YAML (or JSON) and/or the environment and
//! turned into a ready [`HubClient`]. Values from a file take precedence over
//! the environment.

use crate::auth::{credential_key_for_host, CredentialSource, Credentials, TokenSource};
use crate::client::HubClient;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, RetryPolicy, DEFAULT_PRODUCT};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Public hub host
pub const DEFAULT_HOST: &str = "hub.docker.com";

const HOST_PATTERN: &str = r"^[a-zA-Z0-9:.-]+$";

// ============================================================================
// Environment variables
// ============================================================================

/// Host override
pub const ENV_HOST: &str = "DOCKER_HUB_HOST";
/// Login username
pub const ENV_USERNAME: &str = "DOCKER_USERNAME";
/// Login password or personal access token
pub const ENV_PASSWORD: &str = "DOCKER_PASSWORD";
/// Page budget override
pub const ENV_MAX_PAGE_RESULTS: &str = "DOCKER_HUB_MAX_PAGE_RESULTS";

// ============================================================================
// Hub Config
// ============================================================================

/// Everything needed to build a [`HubClient`]
#[derive(Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// API host, without scheme (e.g. `hub.docker.com`)
    #[serde(default = "default_host")]
    pub host: String,

    /// Login username
    #[serde(default)]
    pub username: Option<String>,

    /// Login password or personal access token
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Page budget for list operations (0 = unlimited)
    #[serde(default = "default_max_page_results")]
    pub max_page_results: u64,

    /// Version reported in the user agent
    #[serde(default)]
    pub user_agent_version: Option<String>,

    /// Use the access token stored in the credential source instead of
    /// logging in
    #[serde(default)]
    pub use_access_token: bool,

    /// Overall per-request deadline in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Optional client-side throttle
    #[serde(default)]
    pub requests_per_minute: Option<u32>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_max_page_results() -> u64 {
    50
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    4
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            username: None,
            password: None,
            max_page_results: default_max_page_results(),
            user_agent_version: None,
            use_access_token: false,
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
            requests_per_minute: None,
        }
    }
}

impl std::fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("max_page_results", &self.max_page_results)
            .field("user_agent_version", &self.user_agent_version)
            .field("use_access_token", &self.use_access_token)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}

impl HubConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, treating empty values as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |var: &str| lookup(var).filter(|v| !v.is_empty());
        let mut config = Self::default();
        if let Some(host) = get(ENV_HOST) {
            config.host = host;
        }
        config.username = get(ENV_USERNAME);
        config.password = get(ENV_PASSWORD);
        if let Some(max) = get(ENV_MAX_PAGE_RESULTS) {
            config.max_page_results = max.parse().map_err(|_| {
                Error::invalid_value(ENV_MAX_PAGE_RESULTS, format!("'{max}' is not a page count"))
            })?;
        }
        Ok(config)
    }

    /// Parse YAML (JSON is accepted too)
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Load `path` if given, filling unset credentials and host from the
    /// environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env = Self::from_env()?;
        match path {
            Some(path) => Ok(Self::from_file(path)?.with_fallback(env)),
            None => Ok(env),
        }
    }

    /// Fill unset fields from `fallback`
    #[must_use]
    pub fn with_fallback(mut self, fallback: HubConfig) -> Self {
        if self.host.is_empty() || (self.host == DEFAULT_HOST && fallback.host != DEFAULT_HOST) {
            self.host = fallback.host;
        }
        self.username = self.username.or(fallback.username);
        self.password = self.password.or(fallback.password);
        self
    }

    /// Check the host is present and well formed
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::invalid_value(
                "host",
                format!("missing hub host; set it in the config or via {ENV_HOST}"),
            ));
        }
        let pattern = Regex::new(HOST_PATTERN)
            .map_err(|e| Error::config(format!("host pattern: {e}")))?;
        if !pattern.is_match(&self.host) {
            return Err(Error::invalid_value(
                "host",
                format!("'{}' is not a valid host (of the form 'hub.docker.com')", self.host),
            ));
        }
        Ok(())
    }

    /// `https://{host}/v2`
    pub fn base_url(&self) -> String {
        format!("https://{}/v2", self.host)
    }

    /// Key the credential store files the host's credentials under
    pub fn credential_key(&self) -> String {
        credential_key_for_host(&self.host)
    }

    /// HTTP settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        let version = self
            .user_agent_version
            .as_deref()
            .unwrap_or(env!("CARGO_PKG_VERSION"));
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url())
            .timeout(Duration::from_secs(self.timeout_seconds))
            .retry(RetryPolicy::default().max_retries(self.max_retries))
            .product(DEFAULT_PRODUCT, version);
        if let Some(rpm) = self.requests_per_minute.filter(|rpm| *rpm > 0) {
            builder = builder.rate_limit(RateLimiterConfig::per_minute(rpm));
        }
        builder.build()
    }

    /// Decide how the client obtains tokens
    ///
    /// Explicit username and password win. Otherwise `source` supplies
    /// either an access token (when `use_access_token` is set) or login
    /// credentials for [`credential_key`](Self::credential_key).
    pub async fn token_source(&self, source: Option<Arc<dyn CredentialSource>>) -> Result<TokenSource> {
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            return Ok(TokenSource::Login(Credentials::new(username, password)));
        }

        let source = source.ok_or_else(|| Error::missing_credential("username"))?;
        let key = self.credential_key();
        if self.use_access_token {
            debug!(key = %key, "Using access token from credential source");
            return Ok(TokenSource::AccessToken { source, key });
        }

        debug!(key = %key, "Reading login credentials from credential source");
        let credentials = source.pull_credentials(&key).await?;
        credentials.validate()?;
        Ok(TokenSource::Login(credentials))
    }

    /// Validate and build a client
    pub async fn build_client(&self, source: Option<Arc<dyn CredentialSource>>) -> Result<HubClient> {
        self.validate()?;
        let token_source = self.token_source(source).await?;
        debug!(host = %self.host, max_page_results = self.max_page_results, "Creating hub client");
        HubClient::builder()
            .http_config(self.http_config())
            .token_source(token_source)
            .max_page_results(self.max_page_results)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentials;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use test_case::test_case;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.host, "hub.docker.com");
        assert_eq!(config.max_page_results, 50);
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.base_url(), "https://hub.docker.com/v2");
        assert_eq!(config.credential_key(), "https://index.docker.io/v1/");
    }

    #[test]
    fn test_from_lookup_reads_variables() {
        let config = HubConfig::from_lookup(lookup(&[
            ("DOCKER_HUB_HOST", "hub-stage.docker.com"),
            ("DOCKER_USERNAME", "alice"),
            ("DOCKER_PASSWORD", "s3cret"),
            ("DOCKER_HUB_MAX_PAGE_RESULTS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.host, "hub-stage.docker.com");
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert_eq!(config.password.as_deref(), Some("s3cret"));
        assert_eq!(config.max_page_results, 0);
        assert_eq!(config.credential_key(), "index-stage.docker.io");
    }

    #[test]
    fn test_from_lookup_empty_values_are_unset() {
        let config =
            HubConfig::from_lookup(lookup(&[("DOCKER_HUB_HOST", ""), ("DOCKER_USERNAME", "")])).unwrap();
        assert_eq!(config.host, "hub.docker.com");
        assert!(config.username.is_none());
    }

    #[test]
    fn test_from_lookup_rejects_bad_page_count() {
        let err = HubConfig::from_lookup(lookup(&[("DOCKER_HUB_MAX_PAGE_RESULTS", "lots")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r"
host: registry.example.com:8443
username: bob
max_page_results: 10
requests_per_minute: 120
";
        let config = HubConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.host, "registry.example.com:8443");
        assert_eq!(config.username.as_deref(), Some("bob"));
        assert_eq!(config.max_page_results, 10);
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.requests_per_minute, Some(120));
        assert!(config.http_config().rate_limit.is_some());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host: hub.example.com\nuse_access_token: true").unwrap();
        let config = HubConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host, "hub.example.com");
        assert!(config.use_access_token);
    }

    #[test]
    fn test_from_file_missing() {
        let err = HubConfig::from_file("/nonexistent/hub.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_file_values_win_over_fallback() {
        let file = HubConfig {
            username: Some("file-user".into()),
            ..Default::default()
        };
        let env = HubConfig {
            host: "hub-stage.docker.com".into(),
            username: Some("env-user".into()),
            password: Some("env-pass".into()),
            ..Default::default()
        };
        let merged = file.with_fallback(env);
        assert_eq!(merged.username.as_deref(), Some("file-user"));
        assert_eq!(merged.password.as_deref(), Some("env-pass"));
        assert_eq!(merged.host, "hub-stage.docker.com");
    }

    #[test_case("hub.docker.com", true ; "public host")]
    #[test_case("localhost:8080", true ; "host with port")]
    #[test_case("", false ; "empty")]
    #[test_case("hub.docker.com/v2", false ; "path")]
    #[test_case("https://hub.docker.com", false ; "scheme")]
    fn test_validate_host(host: &str, ok: bool) {
        let config = HubConfig {
            host: host.to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate().is_ok(), ok);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = HubConfig {
            password: Some("hunter2".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_password_not_serialized() {
        let config = HubConfig {
            password: Some("hunter2".into()),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("hunter2"));
    }

    #[test]
    fn test_http_config_user_agent() {
        let config = HubConfig {
            user_agent_version: Some("1.2.3".into()),
            ..Default::default()
        };
        let http = config.http_config();
        assert_eq!(http.user_agent, "registry-hub-client/1.2.3");
        assert_eq!(http.base_url, "https://hub.docker.com/v2");
        assert_eq!(http.timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_token_source_prefers_explicit_credentials() {
        let config = HubConfig {
            username: Some("alice".into()),
            password: Some("pw".into()),
            ..Default::default()
        };
        let source = config.token_source(None).await.unwrap();
        assert!(matches!(source, TokenSource::Login(ref c) if c.username == "alice"));
    }

    #[tokio::test]
    async fn test_token_source_reads_store_for_host_key() {
        let store = StaticCredentials::new()
            .with("https://index.docker.io/v1/", Credentials::new("stored", "pw"));
        let config = HubConfig::default();
        let source = config.token_source(Some(Arc::new(store))).await.unwrap();
        assert!(matches!(source, TokenSource::Login(ref c) if c.username == "stored"));
    }

    #[tokio::test]
    async fn test_token_source_access_token_mode() {
        let config = HubConfig {
            use_access_token: true,
            ..Default::default()
        };
        let source = config
            .token_source(Some(Arc::new(StaticCredentials::new())))
            .await
            .unwrap();
        assert!(matches!(source, TokenSource::AccessToken { ref key, .. } if key == "https://index.docker.io/v1/"));
    }

    #[tokio::test]
    async fn test_token_source_without_anything_fails() {
        let err = HubConfig::default().token_source(None).await.unwrap_err();
        assert!(matches!(err, Error::MissingCredential { .. }));
    }

    #[tokio::test]
    async fn test_build_client_rejects_invalid_host() {
        let config = HubConfig {
            host: "bad host".into(),
            username: Some("a".into()),
            password: Some("b".into()),
            ..Default::default()
        };
        assert!(config.build_client(None).await.is_err());
    }

    #[tokio::test]
    async fn test_build_client() {
        let config = HubConfig {
            username: Some("alice".into()),
            password: Some("pw".into()),
            max_page_results: 3,
            ..Default::default()
        };
        let client = config.build_client(None).await.unwrap();
        assert_eq!(client.base_url(), "https://hub.docker.com/v2");
        assert_eq!(client.max_page_results(), 3);
        assert_eq!(client.identity(), "alice");
    }
}
