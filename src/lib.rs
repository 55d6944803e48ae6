//! CBQL Gateway Library
//!
//! A thin gateway between automated callers and a Codebeamer-style
//! item-tracking REST service. Queries in CBQL are validated locally,
//! executed page by page on the remote service and returned as one
//! aggregated result while progress events stream to the caller.
//!
//! # Architecture
//!
//! - [`query`] - CBQL validation and usage guidance
//! - [`gateway`] - credentialed HTTP requests with rate-limit detection
//! - [`executor`] - paginated query execution and aggregation
//! - [`progress`] - best-effort progress event channel
//! - [`service`] - the tracker operations exposed to callers
//! - [`config`] - gateway configuration from the environment

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod executor;
pub mod gateway;
pub mod progress;
pub mod query;
pub mod service;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, GatewayConfig};
pub use executor::{AggregatedResult, ExecutorError, QueryExecutor};
pub use gateway::{Credential, GatewayError, HttpGateway, RemoteGateway, RemoteRequest};
pub use progress::{ProgressEvent, ProgressSink, ProgressStream, progress_channel};
pub use query::{QueryError, ValidatedQuery, validate};
pub use service::{ToolError, TrackerService};
