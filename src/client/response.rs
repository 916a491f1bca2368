//! Successful response wrapper

use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// A successful response, body already read
#[derive(Debug, Clone)]
pub struct HubResponse {
    /// Resolved request URL
    pub url: String,
    /// HTTP status (2xx or 3xx)
    pub status: StatusCode,
    /// Raw body
    pub body: Bytes,
}

impl HubResponse {
    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::decode(&self.url, e.to_string()))
    }

    /// Body as text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the server sent no body
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
