//! Core types for the Wordgate API client.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable connection settings for one backend.
///
/// Passed explicitly to every transport, so several clients with distinct
/// backends can live side by side.
///
/// # Example
///
/// ```
/// use gatekit::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("https://api.example.com/", "my-app", "s3cret")
///     .timeout(Duration::from_secs(5));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.url("/app/config"), "https://api.example.com/app/config");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL.
    pub base_url: String,
    /// Application code sent with every request.
    pub app_code: String,
    /// Application secret used to sign requests. Never sent over the wire.
    pub app_secret: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config with the default timeout.
    pub fn new(
        base_url: impl Into<String>,
        app_code: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            app_code: app_code.into(),
            app_secret: app_secret.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that the config can be used to make requests.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first missing or malformed field.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base_url is required".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        }
        if self.app_code.trim().is_empty() {
            return Err(Error::Config("app_code is required".into()));
        }
        if self.app_secret.is_empty() {
            return Err(Error::Config("app_secret is required".into()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".into()));
        }
        Ok(())
    }

    /// Build the full URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), normalize_path(path))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("app_code", &self.app_code)
            .field("app_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Ensure an API path starts with exactly one `/`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read-only request.
    Get,
    /// Create or update request with a JSON body.
    Post,
}

impl Method {
    /// Get the method name as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Whether requests with this method mutate remote state.
    #[must_use]
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request observed by [`crate::MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Request method.
    pub method: Method,
    /// Normalized request path.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_with_single_slash() {
        let config = ClientConfig::new("https://api.example.com/", "app", "secret");
        assert_eq!(config.url("app/config"), "https://api.example.com/app/config");
        assert_eq!(config.url("/app/config"), "https://api.example.com/app/config");

        let config = ClientConfig::new("https://api.example.com/v1", "app", "secret");
        assert_eq!(config.url("/app/products"), "https://api.example.com/v1/app/products");
    }

    #[test]
    fn test_validate_missing_fields() {
        assert!(ClientConfig::new("", "app", "secret").validate().is_err());
        assert!(ClientConfig::new("https://x", "", "secret").validate().is_err());
        assert!(ClientConfig::new("https://x", "app", "").validate().is_err());
        assert!(ClientConfig::new("ftp://x", "app", "secret").validate().is_err());
        assert!(
            ClientConfig::new("https://x", "app", "secret")
                .timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ClientConfig::new("https://x", "app", "super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_method() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert!(Method::Post.is_write());
        assert!(!Method::Get.is_write());
    }
}
