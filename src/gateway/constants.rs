//! Constants for the remote request gateway (timeouts, rate limiting).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes; large item pages can be slow).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Retry-After value reported when a 429 carries no usable header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 30;
