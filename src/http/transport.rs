//! Authenticated, retrying transport
//!
//! Every outbound request gets a `User-Agent` and a bearer token from the
//! configured [`TokenProvider`]. If no token can be obtained the request is
//! never sent. Attempts that fail transiently are repeated according to the
//! [`RetryPolicy`]; the final response is handed back unclassified.

use super::cancel::CancelToken;
use super::rate_limit::RateLimiter;
use super::retry::{parse_retry_after, RetryPolicy};
use crate::auth::TokenProvider;
use crate::error::{Error, Result};
use crate::types::Method;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// A request ready to be sent, re-sendable across attempts
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method
    pub method: Method,
    /// Fully resolved URL
    pub url: Url,
    /// JSON body, if any
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    /// Create a request without a body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
        }
    }

    /// Attach a JSON body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Status and fully read body of the final attempt
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response body
    pub body: Bytes,
}

/// Transport that authenticates and retries
pub struct AuthTransport {
    client: Client,
    provider: Arc<dyn TokenProvider>,
    user_agent: String,
    retry: RetryPolicy,
    rate_limiter: Option<RateLimiter>,
}

impl AuthTransport {
    /// Create a transport
    pub fn new(
        client: Client,
        provider: Arc<dyn TokenProvider>,
        user_agent: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            provider,
            user_agent: user_agent.into(),
            retry,
            rate_limiter: None,
        }
    }

    /// Throttle requests through `limiter`
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// The token provider backing this transport
    pub fn provider(&self) -> &Arc<dyn TokenProvider> {
        &self.provider
    }

    /// Retry policy in use
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send `request`, aborting with [`Error::Cancelled`] if `cancel` fires
    pub async fn execute(&self, request: &OutboundRequest, cancel: &CancelToken) -> Result<RawResponse> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(method = %request.method, url = %request.url, "Request cancelled");
                Err(Error::Cancelled)
            }
            result = self.execute_with_retry(request) => result,
        }
    }

    async fn execute_with_retry(&self, request: &OutboundRequest) -> Result<RawResponse> {
        let token = self.provider.ensure_token().await?;
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self
                .client
                .request(request.method.into(), request.url.clone())
                .header(USER_AGENT, &self.user_agent)
                .header(ACCEPT, "application/json")
                .header(CONTENT_TYPE, "application/json")
                .bearer_auth(&token);
            if let Some(body) = &request.body {
                req = req.body(body.clone());
            }

            match req.send().await {
                Ok(response) => {
                    let status = response.status();
                    if attempt < self.retry.max_retries && self.retry.should_retry_status(status) {
                        let delay = self
                            .retry
                            .delay_for(attempt, parse_retry_after(response.headers()));
                        warn!(
                            "{} {} returned {}, attempt {}/{}, retrying in {:?}",
                            request.method,
                            request.url,
                            status.as_u16(),
                            attempt + 1,
                            max_attempts,
                            delay
                        );
                        drop(response);
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let body = response.bytes().await?;
                    debug!(
                        method = %request.method,
                        url = %request.url,
                        status = status.as_u16(),
                        attempts = attempt + 1,
                        "Request completed"
                    );
                    return Ok(RawResponse { status, body });
                }
                Err(e) => {
                    if !self.retry.should_retry_error(&e) {
                        return Err(Error::Http(e));
                    }
                    if attempt >= self.retry.max_retries {
                        return Err(Error::RetriesExhausted {
                            method: request.method.to_string(),
                            url: request.url.to_string(),
                            attempts: attempt + 1,
                            source: e,
                        });
                    }

                    let delay = self.retry.backoff_for(attempt);
                    warn!(
                        "{} {} failed ({}), attempt {}/{}, retrying in {:?}",
                        request.method,
                        request.url,
                        e,
                        attempt + 1,
                        max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl std::fmt::Debug for AuthTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTransport")
            .field("user_agent", &self.user_agent)
            .field("retry", &self.retry)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
