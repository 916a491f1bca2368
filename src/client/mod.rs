//! Hub client
//!
//! [`HubClient`] is the request executor: it resolves URLs against the
//! configured base, sends JSON through the authenticated transport and turns
//! non-success statuses into errors that carry the raw server message.
//!
//! ```rust,ignore
//! use hub_client::{Credentials, HubClient};
//!
//! let client = HubClient::builder()
//!     .base_url("https://hub.docker.com/v2")
//!     .credentials(Credentials::new("alice", "dckr_pat_..."))
//!     .max_page_results(10)
//!     .build()?;
//!
//! let repos = client.list_repositories("alice").await?;
//! ```

mod builder;
mod executor;
mod response;

pub use builder::HubClientBuilder;
pub use response::HubResponse;

use crate::auth::TokenProvider;
use crate::http::{AuthTransport, CancelToken};
use std::sync::Arc;

/// Authenticated client for the hub API
///
/// Cheap to clone; clones share the token cache and connection pool.
#[derive(Clone)]
pub struct HubClient {
    inner: Arc<Inner>,
    cancel: CancelToken,
}

struct Inner {
    base_url: String,
    transport: AuthTransport,
    max_page_results: u64,
}

impl HubClient {
    /// Create a new client builder
    pub fn builder() -> HubClientBuilder {
        HubClientBuilder::default()
    }

    /// Base URL every request is resolved against
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Account the client acts as
    pub fn identity(&self) -> String {
        self.inner.transport.provider().identity()
    }

    /// Token provider backing this client
    pub fn token_provider(&self) -> &Arc<dyn TokenProvider> {
        self.inner.transport.provider()
    }

    /// Page budget for list operations (0 = unlimited)
    pub fn max_page_results(&self) -> u64 {
        self.inner.max_page_results
    }

    /// A handle whose requests abort when `cancel` fires
    #[must_use]
    pub fn with_cancel(&self, cancel: CancelToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel,
        }
    }
}

impl std::fmt::Debug for HubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubClient")
            .field("base_url", &self.inner.base_url)
            .field("transport", &self.inner.transport)
            .field("max_page_results", &self.inner.max_page_results)
            .finish_non_exhaustive()
    }
}
