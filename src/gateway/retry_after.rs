//! Retry-After header interpretation for 429 responses.

use std::time::SystemTime;

use tracing::debug;

use super::constants::DEFAULT_RETRY_AFTER_SECS;

/// Parses a Retry-After header value into whole seconds.
///
/// Supports both formats from RFC 7231:
/// - delta-seconds: `"120"`
/// - HTTP-date: `"Wed, 21 Oct 2015 07:28:00 GMT"`, converted to seconds from
///   now (rounded up, zero if already past)
///
/// Returns `None` for negative or unparseable values. The value is never
/// capped: whatever the remote service asks for is forwarded to the caller.
#[must_use]
pub fn parse_retry_after(header_value: &str) -> Option<u64> {
    let header_value = header_value.trim();

    if let Ok(seconds) = header_value.parse::<u64>() {
        return Some(seconds);
    }

    if let Ok(datetime) = httpdate::parse_http_date(header_value) {
        return Some(match datetime.duration_since(SystemTime::now()) {
            Ok(remaining) => {
                let whole = remaining.as_secs();
                if remaining.subsec_nanos() > 0 {
                    whole.saturating_add(1)
                } else {
                    whole
                }
            }
            Err(_) => {
                debug!(header_value, "Retry-After date is in the past, returning zero");
                0
            }
        });
    }

    debug!(header_value, "unparseable Retry-After value");
    None
}

/// Resolves the wait duration for a 429, defaulting to 30 seconds.
#[must_use]
pub fn retry_after_secs(header_value: Option<&str>) -> u64 {
    header_value
        .and_then(parse_retry_after)
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_parse_retry_after_delta_seconds() {
        assert_eq!(parse_retry_after("120"), Some(120));
        assert_eq!(parse_retry_after(" 7 "), Some(7));
        assert_eq!(parse_retry_after("0"), Some(0));
    }

    #[test]
    fn test_parse_retry_after_large_value_is_not_capped() {
        assert_eq!(parse_retry_after("86400"), Some(86_400));
    }

    #[test]
    fn test_parse_retry_after_rejects_negative_and_garbage() {
        assert_eq!(parse_retry_after("-5"), None);
        assert_eq!(parse_retry_after("soon"), None);
        assert_eq!(parse_retry_after(""), None);
        assert_eq!(parse_retry_after("1.5"), None);
    }

    #[test]
    fn test_parse_retry_after_future_http_date() {
        let future = SystemTime::now() + Duration::from_secs(90);
        let header = httpdate::fmt_http_date(future);
        let secs = parse_retry_after(&header);
        assert!(
            matches!(secs, Some(s) if (85..=91).contains(&s)),
            "got: {secs:?}"
        );
    }

    #[test]
    fn test_parse_retry_after_past_http_date_is_zero() {
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), Some(0));
    }

    #[test]
    fn test_retry_after_secs_defaults_to_thirty() {
        assert_eq!(retry_after_secs(None), 30);
        assert_eq!(retry_after_secs(Some("not-a-number")), 30);
        assert_eq!(retry_after_secs(Some("-1")), 30);
        assert_eq!(retry_after_secs(Some("12")), 12);
    }
}
