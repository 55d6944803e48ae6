//! CBQL policy checks applied before a query leaves the process.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::error::{InvalidQueryReason, QueryError};

/// SQL keywords rejected anywhere in a query, checked in this order.
///
/// Matching is a case-insensitive substring scan, so an identifier such as
/// `insertedBy` is rejected too.
pub const FORBIDDEN_KEYWORDS: [&str; 5] = ["SELECT", "UPDATE", "DELETE", "INSERT", "JOIN"];

/// Mandatory scope clause: `tracker =`, `tracker IN` or `project =`.
#[allow(clippy::expect_used)]
static SCOPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:tracker\s*=|tracker\s+IN|project\s*=)")
        .expect("scope regex is valid") // Static pattern, safe to panic
});

/// A query that passed every rule in [`validate`].
///
/// The only way to obtain one is through [`validate`], so holding a
/// `ValidatedQuery` proves the text is scoped, single-statement and free of
/// SQL keywords. Downstream code treats the text as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedQuery(String);

impl ValidatedQuery {
    /// Returns the trimmed query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the query and returns its text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ValidatedQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validates a raw CBQL query.
///
/// Rules, first failure wins:
/// 1. non-empty after trimming
/// 2. no forbidden SQL keyword ([`FORBIDDEN_KEYWORDS`])
/// 3. a scope clause is present
/// 4. no `;` separator
///
/// # Errors
///
/// Returns [`QueryError::InvalidQuery`] naming the violated rule.
///
/// # Examples
///
/// ```
/// use cbql_gateway::query::validate;
///
/// let query = validate("  tracker = 'Requirements' AND status = 'Open' ").unwrap();
/// assert_eq!(query.as_str(), "tracker = 'Requirements' AND status = 'Open'");
/// assert!(validate("SELECT * FROM items").is_err());
/// ```
#[tracing::instrument(skip(raw), fields(raw_len = raw.len()))]
pub fn validate(raw: &str) -> Result<ValidatedQuery, QueryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(reject(InvalidQueryReason::Empty));
    }

    let upper = raw.to_uppercase();
    if let Some(keyword) = FORBIDDEN_KEYWORDS
        .iter()
        .copied()
        .find(|kw| upper.contains(kw))
    {
        return Err(reject(InvalidQueryReason::ForbiddenKeyword(keyword)));
    }

    if !SCOPE_PATTERN.is_match(raw) {
        return Err(reject(InvalidQueryReason::MissingScope));
    }

    if raw.contains(';') {
        return Err(reject(InvalidQueryReason::MultipleStatements));
    }

    Ok(ValidatedQuery(trimmed.to_string()))
}

fn reject(reason: InvalidQueryReason) -> QueryError {
    debug!(%reason, "CBQL rejected");
    QueryError::invalid(reason)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn reason_of(raw: &str) -> InvalidQueryReason {
        validate(raw).unwrap_err().reason()
    }

    #[test]
    fn test_validate_returns_trimmed_query() {
        let query = validate("\n\t tracker = 'System Requirements'  \n").unwrap();
        assert_eq!(query.as_str(), "tracker = 'System Requirements'");
    }

    #[test]
    fn test_validate_keeps_inner_whitespace() {
        let query = validate(" project = 'A'   AND   status = 'Open' ").unwrap();
        assert_eq!(query.as_str(), "project = 'A'   AND   status = 'Open'");
    }

    #[test]
    fn test_validate_empty_and_whitespace_only() {
        assert_eq!(reason_of(""), InvalidQueryReason::Empty);
        assert_eq!(reason_of("   "), InvalidQueryReason::Empty);
        assert_eq!(reason_of("\n\t"), InvalidQueryReason::Empty);
    }

    #[test]
    fn test_validate_rejects_each_forbidden_keyword_any_case() {
        for keyword in FORBIDDEN_KEYWORDS {
            let lower = format!("tracker = 'A' AND {} x", keyword.to_lowercase());
            assert_eq!(
                reason_of(&lower),
                InvalidQueryReason::ForbiddenKeyword(keyword),
                "query: {lower}"
            );
            let upper = format!("project = 'A' {keyword}");
            assert_eq!(
                reason_of(&upper),
                InvalidQueryReason::ForbiddenKeyword(keyword)
            );
        }
    }

    #[test]
    fn test_validate_forbidden_keyword_wins_over_missing_scope() {
        assert_eq!(
            reason_of("SELECT * FROM items"),
            InvalidQueryReason::ForbiddenKeyword("SELECT")
        );
        assert_eq!(
            reason_of("JOIN tracker"),
            InvalidQueryReason::ForbiddenKeyword("JOIN")
        );
    }

    #[test]
    fn test_validate_first_listed_keyword_is_reported() {
        assert_eq!(
            reason_of("tracker = 'A' JOIN x DELETE y"),
            InvalidQueryReason::ForbiddenKeyword("DELETE")
        );
    }

    #[test]
    fn test_validate_keyword_substring_is_rejected() {
        // Substring matching: a field merely containing a keyword is rejected.
        assert_eq!(
            reason_of("tracker = 'A' AND insertedBy = 'bob'"),
            InvalidQueryReason::ForbiddenKeyword("INSERT")
        );
    }

    #[test]
    fn test_validate_requires_scope() {
        assert_eq!(reason_of("status = 'Open'"), InvalidQueryReason::MissingScope);
        assert_eq!(reason_of("tracker ~ 'A'"), InvalidQueryReason::MissingScope);
        assert_eq!(reason_of("subtracker = 'A'"), InvalidQueryReason::MissingScope);
    }

    #[test]
    fn test_validate_accepts_scope_variants() {
        assert!(validate("tracker = 'A'").is_ok());
        assert!(validate("tracker='A'").is_ok());
        assert!(validate("TRACKER   IN ('A','B')").is_ok());
        assert!(validate("tracker in ('A')").is_ok());
        assert!(validate("Project = 'Apollo'").is_ok());
        assert!(validate("status = 'Open' AND project= 'Apollo'").is_ok());
    }

    #[test]
    fn test_validate_rejects_statement_separator() {
        assert_eq!(
            reason_of("project = 'X'; project = 'Y'"),
            InvalidQueryReason::MultipleStatements
        );
        assert_eq!(
            reason_of("tracker = 'A';"),
            InvalidQueryReason::MultipleStatements
        );
    }

    #[test]
    fn test_validate_scope_checked_before_separator() {
        assert_eq!(reason_of("status = 'Open';"), InvalidQueryReason::MissingScope);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let first = validate("  tracker IN ('A', 'B') AND hasParent(42) ").unwrap();
        let second = validate(first.as_str()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_validated_query_display_and_into_inner() {
        let query = validate("project = 'P'").unwrap();
        assert_eq!(query.to_string(), "project = 'P'");
        assert_eq!(query.into_inner(), "project = 'P'".to_string());
    }
}
