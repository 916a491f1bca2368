//! HTTP transport module
//!
//! Provides the authenticated transport with retry, cancellation and
//! optional throttling.
//!
//! # Features
//!
//! - **Authentication**: bearer token from a [`TokenProvider`](crate::auth::TokenProvider) on every request
//! - **Automatic Retries**: transient network errors and configured 5xx statuses, with backoff
//! - **Cancellation**: [`CancelToken`] aborts in-flight requests
//! - **Rate Limiting**: optional token bucket using governor

mod cancel;
mod config;
mod rate_limit;
mod retry;
mod transport;

pub use cancel::CancelToken;
pub use config::{HttpClientConfig, HttpClientConfigBuilder, DEFAULT_BASE_URL, DEFAULT_PRODUCT};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::{parse_retry_after, RetryPolicy, DEFAULT_RETRY_STATUSES};
pub use transport::{AuthTransport, OutboundRequest, RawResponse};
