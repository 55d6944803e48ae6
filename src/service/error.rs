//! Error type surfaced by every tracker service operation.

use thiserror::Error;

use crate::executor::ExecutorError;
use crate::gateway::GatewayError;
use crate::query::QueryError;

/// Prefix of the boundary message for rate-limited operations.
pub const RATE_LIMITED_PREFIX: &str = "RATE_LIMITED:";

/// Prefix of the boundary message for rejected CBQL.
pub const INVALID_CBQL_PREFIX: &str = "INVALID_CBQL:";

/// Errors returned by [`TrackerService`](super::TrackerService) operations.
///
/// Callers branch on the variant. [`boundary_message`](Self::boundary_message)
/// renders the flat string form expected by existing agent orchestrators.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The CBQL query was rejected before any request was sent.
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    /// A remote request failed (rate limiting, status, decoding, transport).
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A paginated query hit the page ceiling.
    #[error("query still returning full pages after {max_pages} pages; narrow the CBQL scope")]
    PageLimitExceeded {
        /// The configured page ceiling.
        max_pages: u32,
    },

    /// `item_action` was called with an action other than `comment` or `transition`.
    #[error("unsupported item action `{action}` (expected `comment` or `transition`)")]
    UnsupportedAction {
        /// The rejected action name.
        action: String,
    },

    /// An argument is outside its accepted range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Argument name.
        name: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl From<ExecutorError> for ToolError {
    fn from(error: ExecutorError) -> Self {
        match error {
            ExecutorError::Gateway(inner) => Self::Gateway(inner),
            ExecutorError::PageLimitExceeded { max_pages } => Self::PageLimitExceeded { max_pages },
        }
    }
}

impl ToolError {
    /// Returns the wait duration when the operation was rate limited.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Gateway(error) => error.retry_after_secs(),
            _ => None,
        }
    }

    /// Renders the error for the outermost boundary.
    ///
    /// - rate limiting → `RATE_LIMITED:<seconds>`
    /// - rejected CBQL → `INVALID_CBQL:<reason>`
    /// - anything else → the error's display text
    #[must_use]
    pub fn boundary_message(&self) -> String {
        match self {
            Self::Gateway(GatewayError::RateLimited { retry_after_secs }) => {
                format!("{RATE_LIMITED_PREFIX}{retry_after_secs}")
            }
            Self::InvalidQuery(error) => format!("{INVALID_CBQL_PREFIX}{}", error.reason()),
            other => other.to_string(),
        }
    }
}
