//! Error types for the remote request gateway.
//!
//! Each variant is a distinct failure kind callers branch on; none of them is
//! retried inside the gateway.

use thiserror::Error;

/// Errors that can occur during a single remote request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The remote service answered 429 Too Many Requests.
    ///
    /// Transient back-pressure: the caller must wait `retry_after_secs`
    /// before issuing the request again.
    #[error("rate limited by remote service, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait, from the Retry-After header (default 30).
        retry_after_secs: u64,
    },

    /// Any other non-success HTTP status, passed through unmodified.
    #[error("HTTP {status} from remote service: {body}")]
    Remote {
        /// The HTTP status code.
        status: u16,
        /// The response body text (may be empty).
        body: String,
    },

    /// A success response whose body is not valid JSON.
    #[error("undecodable response from {url}: {reason}")]
    Decode {
        /// The request URL.
        url: String,
        /// What failed to decode.
        reason: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error calling {url}: {source}")]
    Network {
        /// The request URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout calling {url}")]
    Timeout {
        /// The request URL.
        url: String,
    },

    /// The base URL or request path does not form a valid URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
    },

    /// The credential cannot be sent as an HTTP header value.
    #[error("credential contains characters not allowed in an HTTP header")]
    InvalidCredential,

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl GatewayError {
    /// Creates a rate-limited error.
    #[must_use]
    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a remote status error.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns the wait duration when this is a rate-limit signal.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}
