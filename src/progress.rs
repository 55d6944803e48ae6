//! Progress stream for paginated query runs.
//!
//! The executor pushes [`ProgressEvent`]s into a [`ProgressSink`] while it
//! runs; the caller drains the matching receiver concurrently (e.g. to drive
//! a spinner). Delivery is best-effort: a consumer that is slow or has gone
//! away never stalls or fails the run.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tokio::sync::mpsc;
use tracing::trace;

/// Lifecycle event of one query run.
///
/// Serialized as `{"event":"START","message":"Executing CBQL query"}` and
/// `{"event":"PROGRESS","page":1,"itemsFetched":500}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The run started; no request has been sent yet.
    Start,
    /// A page was fetched.
    Progress {
        /// 1-based page number.
        page: u32,
        /// Items returned by this page.
        items_fetched: usize,
    },
}

impl ProgressEvent {
    /// Human-readable description for progress displays.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Start => "Executing CBQL query".to_string(),
            Self::Progress {
                page,
                items_fetched,
            } => format!("Fetched page {page} ({items_fetched} items)"),
        }
    }
}

impl Serialize for ProgressEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Start => {
                let mut state = serializer.serialize_struct("ProgressEvent", 2)?;
                state.serialize_field("event", "START")?;
                state.serialize_field("message", &self.message())?;
                state.end()
            }
            Self::Progress {
                page,
                items_fetched,
            } => {
                let mut state = serializer.serialize_struct("ProgressEvent", 3)?;
                state.serialize_field("event", "PROGRESS")?;
                state.serialize_field("page", page)?;
                state.serialize_field("itemsFetched", items_fetched)?;
                state.end()
            }
        }
    }
}

/// Receiving half of a progress channel.
pub type ProgressStream = mpsc::UnboundedReceiver<ProgressEvent>;

/// Push-only, best-effort sender of [`ProgressEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl ProgressSink {
    /// A sink that discards every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Delivers `event` if a consumer is still listening.
    pub fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx
            && tx.send(event).is_err()
        {
            trace!(?event, "progress consumer dropped, event discarded");
        }
    }
}

/// Creates a connected sink/stream pair.
///
/// The channel is unbounded so emitting never waits on the consumer.
#[must_use]
pub fn progress_channel() -> (ProgressSink, ProgressStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSink { tx: Some(tx) }, rx)
}
