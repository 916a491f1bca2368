//! Client builder

use super::{HubClient, Inner};
use crate::auth::{Clock, Credentials, SystemClock, TokenProvider, TokenSource};
use crate::error::{Error, Result};
use crate::http::{AuthTransport, CancelToken, HttpClientConfig, RateLimiter, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default page budget for list operations
pub const DEFAULT_MAX_PAGE_RESULTS: u64 = 50;

/// Builder for [`HubClient`]
pub struct HubClientBuilder {
    http: HttpClientConfig,
    token_source: Option<TokenSource>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    max_page_results: u64,
    clock: Arc<dyn Clock>,
    cancel: CancelToken,
}

impl Default for HubClientBuilder {
    fn default() -> Self {
        Self {
            http: HttpClientConfig::default(),
            token_source: None,
            token_provider: None,
            max_page_results: DEFAULT_MAX_PAGE_RESULTS,
            clock: Arc::new(SystemClock),
            cancel: CancelToken::new(),
        }
    }
}

impl HubClientBuilder {
    /// Replace the whole HTTP configuration
    #[must_use]
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http = config;
        self
    }

    /// Set the base URL (e.g. `https://hub.docker.com/v2`)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http.base_url = url.into();
        self
    }

    /// Set the per-request deadline
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.http.retry = policy;
        self
    }

    /// Set user agent as `<product>/<version>`
    #[must_use]
    pub fn product(mut self, product: &str, version: &str) -> Self {
        self.http.user_agent = format!("{product}/{version}");
        self
    }

    /// Log in with a username and password
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.token_source = Some(TokenSource::Login(credentials));
        self
    }

    /// Choose how tokens are obtained
    #[must_use]
    pub fn token_source(mut self, source: TokenSource) -> Self {
        self.token_source = Some(source);
        self
    }

    /// Use a ready-made token provider, overriding any token source
    #[must_use]
    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Page budget for list operations (0 = unlimited)
    #[must_use]
    pub fn max_page_results(mut self, max_pages: u64) -> Self {
        self.max_page_results = max_pages;
        self
    }

    /// Clock used for token expiry checks
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Cancellation token shared by every request of the built client
    #[must_use]
    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<HubClient> {
        let base_url = self.http.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let client = self.http.build_client()?;
        let provider = match (self.token_provider, self.token_source) {
            (Some(provider), _) => provider,
            (None, Some(source)) => source.into_provider(&base_url, client.clone(), self.clock)?,
            (None, None) => {
                return Err(Error::config(
                    "no credentials or token provider configured",
                ))
            }
        };

        let mut transport =
            AuthTransport::new(client, provider, self.http.user_agent, self.http.retry);
        if let Some(limit) = &self.http.rate_limit {
            transport = transport.with_rate_limiter(RateLimiter::new(limit));
        }

        Ok(HubClient {
            inner: Arc::new(Inner {
                base_url,
                transport,
                max_page_results: self.max_page_results,
            }),
            cancel: self.cancel,
        })
    }
}
