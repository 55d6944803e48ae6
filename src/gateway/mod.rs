//! Remote request gateway.
//!
//! One credentialed HTTP request in, one classified outcome out:
//!
//! - 2xx with a JSON body (or no body) → parsed [`serde_json::Value`]
//! - 429 → [`GatewayError::RateLimited`] with the Retry-After wait (default 30s)
//! - any other non-2xx → [`GatewayError::Remote`] with status and body
//! - 2xx that is not JSON → [`GatewayError::Decode`]
//!
//! The gateway never retries and never backs off. Retrying after a rate limit
//! is left to the outermost caller.

mod client;
pub mod constants;
mod credential;
mod error;
mod request;
mod retry_after;

use async_trait::async_trait;
use serde_json::Value;

pub use client::HttpGateway;
pub use constants::DEFAULT_RETRY_AFTER_SECS;
pub use credential::Credential;
pub use error::GatewayError;
pub use request::{RemoteRequest, RequestBody};
pub use retry_after::{parse_retry_after, retry_after_secs};

/// A transport that can issue one credentialed request to the remote service.
///
/// Uses `async_trait` so executors can hold a `dyn RemoteGateway` and tests
/// can substitute scripted gateways.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Issues `request` with `credential` attached as the `Authorization`
    /// header and classifies the response.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for rate limiting, non-success statuses,
    /// undecodable bodies and transport failures.
    async fn call(
        &self,
        credential: &Credential,
        request: RemoteRequest,
    ) -> Result<Value, GatewayError>;
}
