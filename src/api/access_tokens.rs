//! Personal access tokens

use crate::client::HubClient;
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical hyphenated UUID, the only id shape the hub issues for tokens
const TOKEN_ID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

/// A personal access token
///
/// `token` is only populated in the response to a create call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessToken {
    pub uuid: String,
    pub client_id: String,
    pub creator_ip: String,
    pub creator_ua: String,
    pub created_at: Option<String>,
    pub last_used: Option<String>,
    pub generated_by: String,
    pub is_active: bool,
    pub token: String,
    pub token_label: String,
    pub scopes: Vec<String>,
}

/// Body for [`HubClient::create_access_token`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenCreateParams {
    pub token_label: String,
    pub scopes: Vec<String>,
}

/// Body for [`HubClient::update_access_token`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenUpdateParams {
    pub token_label: String,
    pub is_active: bool,
}

// The id is spliced into the path, so anything but a UUID could walk it
// onto another endpoint.
fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::invalid_argument("access token id is required"));
    }
    let pattern = Regex::new(TOKEN_ID_PATTERN)
        .map_err(|e| Error::config(format!("token id pattern: {e}")))?;
    if !pattern.is_match(id) {
        return Err(Error::invalid_argument(format!(
            "access token id '{id}' is not a valid UUID"
        )));
    }
    Ok(())
}

impl HubClient {
    /// Create an access token; the secret is only returned here
    pub async fn create_access_token(&self, params: &AccessTokenCreateParams) -> Result<AccessToken> {
        self.post("/access-tokens", params).await
    }

    /// Fetch an access token by id
    pub async fn get_access_token(&self, id: &str) -> Result<AccessToken> {
        require_id(id)?;
        self.get(&format!("/access-tokens/{id}")).await
    }

    /// List the caller's access tokens
    pub async fn list_access_tokens(&self) -> Result<Vec<AccessToken>> {
        self.paginate("/access-tokens").await
    }

    /// Rename or (de)activate an access token
    pub async fn update_access_token(
        &self,
        id: &str,
        params: &AccessTokenUpdateParams,
    ) -> Result<AccessToken> {
        require_id(id)?;
        self.patch(&format!("/access-tokens/{id}"), params).await
    }

    /// Delete an access token
    pub async fn delete_access_token(&self, id: &str) -> Result<()> {
        require_id(id)?;
        self.delete(&format!("/access-tokens/{id}")).await
    }
}
