//! Request execution: URL resolution, JSON encoding, status classification

use super::{HubClient, HubResponse};
use crate::error::{Error, Result};
use crate::http::OutboundRequest;
use crate::types::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

/// True when `url` starts with `scheme://`, ignoring `://` inside a path or query
fn has_scheme(url: &str) -> bool {
    url.find("://").is_some_and(|i| {
        let scheme = &url[..i];
        !scheme.is_empty() && !scheme.contains(['/', '?', '#'])
    })
}

impl HubClient {
    /// Resolve `url` against the base URL
    ///
    /// Relative paths are joined onto the base. Absolute URLs that already
    /// start with the base are normalized back to relative form first, so
    /// both spellings produce the same request. Any other absolute URL is
    /// rejected so the bearer token is never sent to a foreign host.
    pub fn resolve_url(&self, url: &str) -> Result<Url> {
        let base = self.base_url();
        let relative = match url.strip_prefix(base) {
            Some(rest) if rest.is_empty() || rest.starts_with(['/', '?']) => rest,
            _ if has_scheme(url) => {
                return Err(Error::ForeignUrl {
                    url: url.to_string(),
                })
            }
            _ => url,
        };

        let joined = if relative.is_empty() || relative.starts_with(['/', '?']) {
            format!("{base}{relative}")
        } else {
            format!("{base}/{relative}")
        };
        Ok(Url::parse(&joined)?)
    }

    /// Send one request and classify the response
    ///
    /// Status codes in `[200, 400)` are success. Anything else becomes
    /// [`Error::HttpStatus`] carrying the response body verbatim.
    pub async fn send(&self, method: Method, url: &str, body: Option<Vec<u8>>) -> Result<HubResponse> {
        let resolved = self.resolve_url(url)?;
        let mut request = OutboundRequest::new(method, resolved);
        if let Some(body) = body {
            request = request.with_body(body);
        }

        debug!(method = %method, url = %request.url, "Sending request");
        let raw = self.inner.transport.execute(&request, &self.cancel).await?;
        let status = raw.status.as_u16();
        debug!(method = %method, url = %request.url, status, bytes = raw.body.len(), "Received response");

        if !(200..400).contains(&status) {
            return Err(Error::http_status(
                method.as_str(),
                request.url.as_str(),
                status,
                String::from_utf8_lossy(&raw.body),
            ));
        }

        Ok(HubResponse {
            url: request.url.to_string(),
            status: raw.status,
            body: raw.body,
        })
    }

    /// Send with an optional JSON-encoded body
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<HubResponse> {
        let encoded = body.map(serde_json::to_vec).transpose()?;
        self.send(method, url, encoded).await
    }

    /// GET and decode the JSON response
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.send(Method::GET, url, None).await?.json()
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, url, Some(body)).await?.json()
    }

    /// POST a JSON body, ignoring the response body
    pub async fn post_no_content<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<()> {
        self.send_json(Method::POST, url, Some(body)).await?;
        Ok(())
    }

    /// PATCH a JSON body and decode the JSON response
    pub async fn patch<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, url, Some(body)).await?.json()
    }

    /// PUT a JSON body and decode the JSON response
    pub async fn put<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, url, Some(body)).await?.json()
    }

    /// PUT a JSON body, ignoring the response body
    pub async fn put_no_content<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<()> {
        self.send_json(Method::PUT, url, Some(body)).await?;
        Ok(())
    }

    /// DELETE; an empty response body is expected
    pub async fn delete(&self, url: &str) -> Result<()> {
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }
}
