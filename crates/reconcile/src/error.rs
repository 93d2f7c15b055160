//! Engine-level errors

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that abort a whole sync phase
///
/// Per-item create/update failures are never reported this way; they are
/// recorded in the phase's [`crate::SyncOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The remote state could not be fetched, so nothing could be classified
    #[error("failed to fetch remote {kind} records: {message}")]
    Fetch {
        /// Entity kind being synced
        kind: &'static str,
        /// Underlying error message
        message: String,
    },
}

impl SyncError {
    /// Create a fetch error from any error chain
    pub fn fetch(kind: &'static str, err: &anyhow::Error) -> Self {
        Self::Fetch {
            kind,
            message: format!("{err:#}"),
        }
    }

    /// Entity kind the error belongs to
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { kind, .. } => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = SyncError::fetch("product", &anyhow::anyhow!("connection refused"));
        assert_eq!(err.kind(), "product");
        assert_eq!(
            err.to_string(),
            "failed to fetch remote product records: connection refused"
        );
    }

    #[test]
    fn test_fetch_error_keeps_context_chain() {
        let err = anyhow::anyhow!("timed out").context("GET /app/products");
        let err = SyncError::fetch("product", &err);
        assert!(err.to_string().contains("GET /app/products: timed out"));
    }
}
