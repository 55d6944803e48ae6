//! Opaque caller credential.

use std::fmt;

/// Authorization value supplied by the caller for one inbound call.
///
/// Forwarded byte-for-byte as the `Authorization` header of every outbound
/// request. The value is never inspected, rewritten or logged: `Debug`
/// prints a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw authorization value (e.g. `Bearer eyJ...` or `Basic ...`).
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw value for placing on the wire.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("Bearer secret-token");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("secret-token"), "leaked: {debug}");
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_credential_expose_is_unmodified() {
        let raw = "  Basic dXNlcjpwYXNz  ";
        assert_eq!(Credential::new(raw).expose(), raw);
    }
}
