//! Tracker service: the operations exposed to calling agents.
//!
//! [`TrackerService::query_items`] is the only operation with real logic: it
//! validates CBQL and hands it to the paginated [`QueryExecutor`]. Every
//! other operation is a single credentialed request through the
//! [`RemoteGateway`], optionally reshaping the response.
//!
//! Every method takes the caller's [`Credential`] explicitly; the service
//! keeps no per-caller state, so concurrent calls never interact.

mod collaboration;
mod error;
mod items;
mod projects;
pub mod types;

use std::num::NonZeroU32;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use crate::config::GatewayConfig;
use crate::executor::{AggregatedResult, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, QueryExecutor};
use crate::gateway::{Credential, GatewayError, RemoteGateway, RemoteRequest};
use crate::progress::ProgressSink;
use crate::query::validate;

pub use error::{INVALID_CBQL_PREFIX, RATE_LIMITED_PREFIX, ToolError};
pub use items::ItemAction;
pub use types::{
    ProjectDetails, ProjectList, ProjectSummary, TrackerDetails, TrackerList, TrackerSummary,
};

/// Typed operations over the remote item-tracking service.
#[derive(Debug, Clone)]
pub struct TrackerService<G> {
    gateway: G,
    default_page_size: NonZeroU32,
    max_pages: u32,
}

impl<G: RemoteGateway> TrackerService<G> {
    /// Creates a service with default paging (500 items per page, 1000 pages max).
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            default_page_size: NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Creates a service using the paging settings from `config`.
    pub fn with_config(gateway: G, config: &GatewayConfig) -> Self {
        Self::new(gateway).with_paging(config.default_page_size, config.max_pages)
    }

    /// Overrides paging defaults. Zero values fall back to 1.
    #[must_use]
    pub fn with_paging(mut self, default_page_size: u32, max_pages: u32) -> Self {
        self.default_page_size = NonZeroU32::new(default_page_size).unwrap_or(NonZeroU32::MIN);
        self.max_pages = max_pages.max(1);
        self
    }

    /// Returns the underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Runs a CBQL query across all pages.
    ///
    /// `page_size` defaults to the configured page size (500). Validation
    /// happens before any request is sent.
    ///
    /// # Errors
    ///
    /// - [`ToolError::InvalidQuery`] if the CBQL is rejected
    /// - [`ToolError::InvalidArgument`] if `page_size` is zero
    /// - [`ToolError::Gateway`] if any page request fails, including
    ///   `RateLimited`; no partial result is returned
    /// - [`ToolError::PageLimitExceeded`] if the page ceiling is reached
    #[instrument(skip(self, credential, cbql, progress))]
    pub async fn query_items(
        &self,
        credential: &Credential,
        cbql: &str,
        page_size: Option<u32>,
        progress: &ProgressSink,
    ) -> Result<AggregatedResult, ToolError> {
        let query = validate(cbql)?;
        let page_size = match page_size {
            None => self.default_page_size,
            Some(size) => NonZeroU32::new(size).ok_or(ToolError::InvalidArgument {
                name: "page_size",
                reason: "must be greater than zero",
            })?,
        };

        let result = QueryExecutor::new(&self.gateway)
            .with_max_pages(self.max_pages)
            .run(credential, &query, page_size, progress)
            .await?;
        Ok(result)
    }

    async fn send(
        &self,
        credential: &Credential,
        request: RemoteRequest,
    ) -> Result<Value, ToolError> {
        Ok(self.gateway.call(credential, request).await?)
    }

    async fn send_decoded<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        request: RemoteRequest,
    ) -> Result<T, ToolError> {
        let path = request.path.clone();
        let value = self.send(credential, request).await?;
        serde_json::from_value(value)
            .map_err(|e| ToolError::Gateway(GatewayError::decode(path, e.to_string())))
    }
}
