//! Error types for the hub client
//!
//! Every public API returns `Result<T, Error>`. Errors carry enough context
//! (method, URL, status, raw body) to diagnose a failure without re-running
//! with verbose logging.

use thiserror::Error;

/// The main error type for the hub client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Credential Errors
    // ============================================================================
    #[error("Missing credential: empty {field}")]
    MissingCredential { field: String },

    // ============================================================================
    // Token Errors
    // ============================================================================
    #[error("Token does not contain an expiry claim")]
    NoExpiry,

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    #[error("No usable access token for '{key}': {message}")]
    TokenSourceUnavailable { key: String, message: String },

    #[error("Login failed with HTTP {status}: {body}")]
    LoginFailed { status: u16, body: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} failed after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        method: String,
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Refusing to send credentials to foreign URL: {url}")]
    ForeignUrl { url: String },

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("server response {status} for {method} {url}: {body}")]
    HttpStatus {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a missing credential error
    pub fn missing_credential(field: impl Into<String>) -> Self {
        Self::MissingCredential {
            field: field.into(),
        }
    }

    /// Create an invalid token error
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Create a token source error
    pub fn source_unavailable(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TokenSourceUnavailable {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(
        method: impl Into<String>,
        url: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::HttpStatus {
            method: method.into(),
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
        }
    }

    /// HTTP status of the response, for status errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } | Error::LoginFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry the whole operation.
    ///
    /// The transport already retried transient failures; this only reports
    /// conditions where a later attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RetriesExhausted { .. } | Error::TokenSourceUnavailable { .. } => {
                true
            }
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 500 | 502 | 503 | 504)
}

/// Result type alias for the hub client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing_credential("username");
        assert_eq!(err.to_string(), "Missing credential: empty username");

        let err = Error::http_status("DELETE", "https://hub.example/v2/x/", 404, "{\"detail\":\"nope\"}");
        assert_eq!(
            err.to_string(),
            "server response 404 for DELETE https://hub.example/v2/x/: {\"detail\":\"nope\"}"
        );

        assert_eq!(
            Error::NoExpiry.to_string(),
            "Token does not contain an expiry claim"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::http_status("GET", "u", 500, "").is_retryable());
        assert!(Error::http_status("GET", "u", 503, "").is_retryable());
        assert!(Error::source_unavailable("k", "gone").is_retryable());

        assert!(!Error::http_status("GET", "u", 400, "").is_retryable());
        assert!(!Error::http_status("GET", "u", 401, "").is_retryable());
        assert!(!Error::http_status("GET", "u", 429, "").is_retryable());
        assert!(!Error::NoExpiry.is_retryable());
        assert!(!Error::Cancelled.is_retryable());
        assert!(!Error::decode("u", "eof").is_retryable());
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(Error::http_status("GET", "u", 404, "").status(), Some(404));
        assert_eq!(
            Error::LoginFailed {
                status: 401,
                body: String::new()
            }
            .status(),
            Some(401)
        );
        assert_eq!(Error::Cancelled.status(), None);
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
