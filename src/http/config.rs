//! HTTP client configuration

use super::rate_limit::RateLimiterConfig;
use super::retry::RetryPolicy;
use crate::error::Result;
use crate::types::BackoffType;
use reqwest::Client;
use std::time::Duration;

/// Base URL of the public hub API
pub const DEFAULT_BASE_URL: &str = "https://hub.docker.com/v2";

/// Product name sent in the `User-Agent` header
pub const DEFAULT_PRODUCT: &str = "registry-hub-client";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Overall deadline per request
    pub timeout: Duration,
    /// Retry behaviour for transient failures
    pub retry: RetryPolicy,
    /// Optional client-side throttle
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string (`<product>/<version>`)
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
            rate_limit: None,
            user_agent: format!("{DEFAULT_PRODUCT}/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Build the underlying reqwest client
    pub fn build_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?)
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Replace the retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.retry = self.config.retry.backoff(backoff_type, initial, max);
        self
    }

    /// Enable the client-side throttle
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set user agent verbatim
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set user agent as `<product>/<version>`
    pub fn product(mut self, product: &str, version: &str) -> Self {
        self.config.user_agent = format!("{product}/{version}");
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}
