//! Error types for paginated query runs.

use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors that abort a paginated query run.
///
/// Any error discards the items accumulated so far; a run either returns the
/// complete result or nothing.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// A page request failed. The gateway's error kind is preserved.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Every page up to the configured ceiling came back full.
    #[error("query still returning full pages after {max_pages} pages; narrow the CBQL scope")]
    PageLimitExceeded {
        /// The configured page ceiling.
        max_pages: u32,
    },
}

impl ExecutorError {
    /// Returns the wait duration when the run was rate limited.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Gateway(error) => error.retry_after_secs(),
            Self::PageLimitExceeded { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_is_transparent() {
        let error = ExecutorError::from(GatewayError::rate_limited(12));
        assert_eq!(error.to_string(), GatewayError::rate_limited(12).to_string());
        assert_eq!(error.retry_after_secs(), Some(12));
    }

    #[test]
    fn test_page_limit_display() {
        let error = ExecutorError::PageLimitExceeded { max_pages: 4 };
        assert!(error.to_string().contains("4 pages"), "got: {error}");
        assert_eq!(error.retry_after_secs(), None);
    }
}
