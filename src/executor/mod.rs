//! Paginated CBQL query execution.
//!
//! A run walks `v3/items/query` page by page, strictly sequentially, until a
//! page comes back shorter than the requested page size. Items are
//! concatenated in page order, then in-page order, without reordering or
//! de-duplication. Progress is pushed to a [`ProgressSink`] as pages arrive.
//!
//! A failure on any page (rate limiting included) aborts the run and drops
//! everything fetched so far. Nothing is retried here: a rate-limited caller
//! waits the indicated duration and restarts from page 1.

mod error;

use std::num::NonZeroU32;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::gateway::{Credential, GatewayError, RemoteGateway, RemoteRequest};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::query::ValidatedQuery;

pub use error::ExecutorError;

/// REST path of the paginated item query endpoint.
pub const ITEMS_QUERY_PATH: &str = "v3/items/query";

/// Page size used when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Default ceiling on pages fetched in one run.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// All items of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResult {
    /// Number of items across all pages.
    pub total_count: usize,
    /// Items in page order, then in-page order.
    pub items: Vec<Value>,
}

impl AggregatedResult {
    fn new(items: Vec<Value>) -> Self {
        Self {
            total_count: items.len(),
            items,
        }
    }
}

/// Drives multi-page item queries through a [`RemoteGateway`].
pub struct QueryExecutor<'a, G: RemoteGateway + ?Sized> {
    gateway: &'a G,
    max_pages: u32,
}

impl<'a, G: RemoteGateway + ?Sized> QueryExecutor<'a, G> {
    /// Creates an executor with the default page ceiling.
    pub fn new(gateway: &'a G) -> Self {
        Self {
            gateway,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Overrides the page ceiling (at least 1).
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Runs `query` to completion.
    ///
    /// Emits [`ProgressEvent::Start`] first, then one
    /// [`ProgressEvent::Progress`] per fetched page. Events already emitted
    /// stay delivered even when the run later fails.
    ///
    /// # Errors
    ///
    /// - [`ExecutorError::Gateway`] with the page request's failure
    ///   (`RateLimited`, `Remote`, `Decode`, transport errors); a page whose
    ///   `items` field is not an array is a `Decode` failure
    /// - [`ExecutorError::PageLimitExceeded`] when the ceiling is reached
    ///   while pages are still full
    #[instrument(skip(self, credential, query, progress), fields(page_size = page_size.get()))]
    pub async fn run(
        &self,
        credential: &Credential,
        query: &ValidatedQuery,
        page_size: NonZeroU32,
        progress: &ProgressSink,
    ) -> Result<AggregatedResult, ExecutorError> {
        progress.emit(ProgressEvent::Start);

        let full_page = usize::try_from(page_size.get()).unwrap_or(usize::MAX);
        let mut items: Vec<Value> = Vec::new();
        let mut page: u32 = 1;

        loop {
            let request = RemoteRequest::post(ITEMS_QUERY_PATH).json(json!({
                "queryString": query.as_str(),
                "page": page,
                "pageSize": page_size.get(),
            }));
            let response = self.gateway.call(credential, request).await?;
            let page_items = extract_items(response, page)?;
            let fetched = page_items.len();
            items.extend(page_items);

            debug!(page, fetched, total = items.len(), "fetched query page");
            progress.emit(ProgressEvent::Progress {
                page,
                items_fetched: fetched,
            });

            if fetched < full_page {
                break;
            }
            if page >= self.max_pages {
                return Err(ExecutorError::PageLimitExceeded {
                    max_pages: self.max_pages,
                });
            }
            page += 1;
        }

        info!(pages = page, total = items.len(), "CBQL query complete");
        Ok(AggregatedResult::new(items))
    }
}

/// Takes the `items` array out of a page response; a missing or null field
/// means an empty page.
fn extract_items(response: Value, page: u32) -> Result<Vec<Value>, GatewayError> {
    let Value::Object(mut body) = response else {
        return Err(GatewayError::decode(
            ITEMS_QUERY_PATH,
            format!("page {page}: response is not a JSON object"),
        ));
    };
    match body.remove("items") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(GatewayError::decode(
            ITEMS_QUERY_PATH,
            format!("page {page}: `items` is not an array"),
        )),
    }
}
