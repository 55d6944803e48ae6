//! Error types for CBQL validation.

use std::fmt;

use thiserror::Error;

/// Which validation rule rejected a query.
///
/// Rules are checked in declaration order and the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidQueryReason {
    /// The query is empty or whitespace-only.
    Empty,
    /// The query contains an SQL keyword that CBQL does not support.
    ForbiddenKeyword(&'static str),
    /// No `tracker =`, `tracker IN` or `project =` clause was found.
    MissingScope,
    /// The query contains a `;` statement separator.
    MultipleStatements,
}

impl fmt::Display for InvalidQueryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::ForbiddenKeyword(keyword) => write!(f, "forbidden keyword {keyword}"),
            Self::MissingScope => f.write_str("missing scope"),
            Self::MultipleStatements => f.write_str("multiple statements"),
        }
    }
}

/// Errors produced by [`validate`](super::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The query violates a CBQL policy rule. Raised before any network I/O.
    #[error("invalid CBQL: {reason}\n  Suggestion: {suggestion}")]
    InvalidQuery {
        /// The violated rule.
        reason: InvalidQueryReason,
        /// How to fix the query.
        suggestion: &'static str,
    },
}

impl QueryError {
    /// Creates an `InvalidQuery` error with a suggestion matching the rule.
    #[must_use]
    pub fn invalid(reason: InvalidQueryReason) -> Self {
        let suggestion = match reason {
            InvalidQueryReason::Empty => "Provide a CBQL expression",
            InvalidQueryReason::ForbiddenKeyword(_) => {
                "CBQL is not SQL; use AND/OR/NOT with =, !=, IN or ~"
            }
            InvalidQueryReason::MissingScope => {
                "Add tracker = '...', tracker IN (...) or project = '...'"
            }
            InvalidQueryReason::MultipleStatements => "Combine the conditions into one expression",
        };
        Self::InvalidQuery { reason, suggestion }
    }

    /// Returns the violated rule.
    #[must_use]
    pub fn reason(&self) -> InvalidQueryReason {
        match self {
            Self::InvalidQuery { reason, .. } => *reason,
        }
    }
}
