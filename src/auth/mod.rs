//! Authentication module
//!
//! Supplies bearer tokens to the transport. The login provider caches the
//! short-lived token it receives and refreshes it only once it expires;
//! concurrent callers share one refresh.

mod credentials;
mod provider;
mod types;

pub use credentials::{
    access_token_key, credential_key_for_host, CredentialSource, EnvCredentials,
    StaticCredentials, HUB_CREDENTIAL_KEY, HUB_STAGE_CREDENTIAL_KEY,
};
pub use provider::{AccessTokenProvider, LoginTokenProvider, TokenProvider, TokenSource};
pub use types::{
    is_jwt_acceptable, CachedToken, Clock, Credentials, ManualClock, SystemClock, TokenClaims,
};

#[cfg(test)]
mod tests;
