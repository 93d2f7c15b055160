//! Error types for Wordgate API operations.
//!
//! Errors are categorized so callers can tell a backend that is unreachable
//! or misconfigured (fatal for a whole sync phase) from one that rejected a
//! single request.

use std::fmt;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Could not reach the backend (DNS, connect, timeout, I/O).
    Network,
    /// Credentials were rejected.
    Auth,
    /// The backend answered with an error status.
    Api,
    /// The backend answered with something that is not the expected JSON.
    Protocol,
    /// The client configuration is unusable.
    Config,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Authentication failed",
            Self::Api => "Request rejected by the backend",
            Self::Protocol => "Unexpected response from the backend",
            Self::Config => "Invalid client configuration",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check base_url and your network connection, then run again",
            Self::Auth => "Check app_code and app_secret",
            Self::Api => "Check the error message for the offending field",
            Self::Protocol => "Check that base_url points at a Wordgate API",
            Self::Config => "Fix the configuration file and run again",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the Wordgate API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Client configuration is incomplete or malformed.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// Request never produced an HTTP response.
    #[error("network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// Backend rejected the credentials.
    #[error("unauthorized (HTTP {status}): {message}")]
    Unauthorized {
        /// HTTP status code (401 or 403).
        status: u16,
        /// Message reported by the backend.
        message: String,
    },

    /// Backend answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the backend.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,
            Error::Network { .. } => ErrorCategory::Network,
            Error::Unauthorized { .. } => ErrorCategory::Auth,
            Error::Api { .. } => ErrorCategory::Api,
            Error::InvalidResponse(_) => ErrorCategory::Protocol,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// HTTP status code, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { status, .. } | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) if code == 401 || code == 403 => Self::Unauthorized {
                status: code,
                message: format!("HTTP {code}"),
            },
            ureq::Error::StatusCode(code) => Self::Api {
                status: code,
                message: format!("HTTP {code}"),
            },
            other => Self::Network {
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
