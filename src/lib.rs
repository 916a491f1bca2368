// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # Registry Hub Client
//!
//! An authenticated async client for the registry hub REST API.
//!
//! ## Features
//!
//! - **Token lifecycle**: log in with a password or personal access token,
//!   cache the JWT until it expires, refresh on demand with a single login
//!   in flight
//! - **Access tokens from a store**: read pre-issued tokens from a
//!   credential source on every request
//! - **Resilient transport**: retries transient failures and 5xx responses
//!   with backoff, never retries 4xx, honours cancellation
//! - **Bounded pagination**: follows `next` cursors under a page budget
//! - **Typed API**: repositories, tags, access tokens, organizations, teams
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hub_client::{Credentials, HubClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = HubClient::builder()
//!         .credentials(Credentials::new("alice", "dckr_pat_..."))
//!         .max_page_results(0)
//!         .build()?;
//!
//!     for repo in client.list_repositories("alice").await? {
//!         println!("{} ({} pulls)", repo.full_name(), repo.pull_count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  api: repositories, access tokens, orgs, teams           │
//! └──────────────────────────────┬───────────────────────────┘
//!                                │
//! ┌───────────────┬──────────────┴────────┬──────────────────┐
//! │  Pagination   │  Request executor     │  Config          │
//! │  Page budget  │  URL resolution       │  YAML / env      │
//! │  Page stream  │  Status → error       │  Token source    │
//! └───────────────┴──────────────┬────────┴──────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────┐
//! │  http: AuthTransport (bearer, user agent, retry, cancel) │
//! └──────────────────────────────┬───────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────┐
//! │  auth: TokenProvider (login cache │ access token source) │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the hub client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials, token providers and credential sources
pub mod auth;

/// Authenticated transport with retry, cancellation and rate limiting
pub mod http;

/// Request executor
pub mod client;

/// Cursor pagination under a page budget
pub mod pagination;

/// Typed hub API
pub mod api;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, ResultExt};
pub use types::*;

// Re-export commonly used types
pub use auth::{Credentials, CredentialSource, TokenProvider, TokenSource};
pub use client::{HubClient, HubClientBuilder, HubResponse};
pub use config::HubConfig;
pub use http::{CancelToken, HttpClientConfig, RetryPolicy};
pub use pagination::{Page, PageBudget, Paginator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
