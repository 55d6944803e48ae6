//! Progress UI (spinner) for query runs.

use std::time::Duration;

use cbql_gateway::{ProgressEvent, ProgressStream};
use indicatif::{ProgressBar, ProgressStyle};

/// Spawns a spinner that renders events from `stream` until the stream
/// closes, i.e. until every sink for it has been dropped.
///
/// When `use_spinner` is false the stream is dropped immediately and `None`
/// is returned; later emits are discarded by the sink.
pub(crate) fn spawn_progress_ui(
    use_spinner: bool,
    stream: ProgressStream,
) -> Option<tokio::task::JoinHandle<()>> {
    if !use_spinner {
        return None;
    }
    Some(spawn_spinner_inner(stream))
}

fn spawn_spinner_inner(mut stream: ProgressStream) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        let mut total_fetched = 0usize;
        while let Some(event) = stream.recv().await {
            if let ProgressEvent::Progress { items_fetched, .. } = event {
                total_fetched = total_fetched.saturating_add(items_fetched);
            }
            spinner.set_message(format!("{} [{total_fetched} total]", event.message()));
        }

        spinner.finish_and_clear();
    })
}
