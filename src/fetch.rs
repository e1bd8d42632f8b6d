// src/fetch.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! The `fetch random` flow: list → filter missing → sample → materialize.
//!
//! Listing and presence-probe failures end the run. Fetch failures are
//! logged with their key, counted, and the remaining selection continues.

use std::sync::Arc;

use futures::{stream, Stream, StreamExt};
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::catalog::list_all;
use crate::config::FetchConfig;
use crate::download::{fetch_object, Materialized};
use crate::error::{Error, Result};
use crate::object_store::{ObjectStore, RemoteObject};
use crate::presence::filter_missing;
use crate::sampler::select_random;

/// Hooks for progress display. All methods default to no-ops.
pub trait FetchObserver: Send + Sync {
    /// Called once, after sampling, with the number and total size of selected objects.
    fn on_selected(&self, _objects: usize, _total_bytes: u64) {}
    fn on_object_done(&self, _done: &Materialized) {}
    fn on_object_failed(&self, _key: &str, _err: &Error) {}
}

/// Counts for one run. `succeeded + failed + skipped == selected`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub listed:        usize,
    pub missing:       usize,
    pub selected:      usize,
    pub succeeded:     usize,
    pub failed:        usize,
    /// Selected objects never started because the run was cancelled.
    pub skipped:       usize,
    pub bytes_written: u64,
    pub cancelled:     bool,
}

impl std::fmt::Display for FetchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} succeeded, {} failed", self.succeeded, self.failed)?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}

enum Outcome {
    Done(Materialized),
    Failed(String, Error),
    Skipped,
}

/// Run the whole fetch flow against `store`.
pub async fn fetch_random<R>(
    store: Arc<dyn ObjectStore>,
    config: &FetchConfig,
    rng: &mut R,
    cancel: &CancellationToken,
    observer: Option<Arc<dyn FetchObserver>>,
) -> Result<FetchSummary>
where
    R: Rng + ?Sized,
{
    info!("Fetching manifest from object store...");
    let inventory = list_all(store.as_ref(), &config.bucket, cancel).await?;
    info!(total = inventory.len(), "Found objects in bucket");

    let missing = filter_missing(&inventory, &config.output_root)?;
    let missing_count = missing.len();
    info!(missing = missing_count, total = inventory.len(), "Filtered for missing files");

    info!(requested = config.count, available = missing_count, "Selecting random files");
    let selection = select_random(missing, config.count, rng);
    info!(count = selection.len(), "Selected files for download");

    let mut summary = FetchSummary {
        listed: inventory.len(),
        missing: missing_count,
        selected: selection.len(),
        ..Default::default()
    };
    if let Some(obs) = &observer {
        obs.on_selected(selection.len(), selection.iter().map(|o| o.size).sum());
    }

    let mut outcomes = std::pin::pin!(materialize_all(store.as_ref(), config, &selection, cancel));
    while let Some(outcome) = outcomes.next().await {
        match outcome {
            Outcome::Done(done) => {
                summary.succeeded += 1;
                summary.bytes_written += done.bytes_written;
                if let Some(obs) = &observer {
                    obs.on_object_done(&done);
                }
            }
            Outcome::Failed(key, err) => {
                summary.failed += 1;
                error!(key = %key, error = %err, "Failed to download file");
                if let Some(obs) = &observer {
                    obs.on_object_failed(&key, &err);
                }
            }
            Outcome::Skipped => summary.skipped += 1,
        }
    }

    summary.cancelled = cancel.is_cancelled();
    if summary.cancelled {
        warn!(skipped = summary.skipped, "Fetch cancelled before all selected files were started");
    }
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        bytes = summary.bytes_written,
        "Fetch complete"
    );
    Ok(summary)
}

/// Stream of per-object outcomes with at most `config.jobs` fetches in flight.
///
/// Objects are started in selection order; each future owns its object, so
/// no cursor is shared between workers. A cancelled token turns every
/// not-yet-started object into `Skipped`.
fn materialize_all<'a>(
    store: &'a dyn ObjectStore,
    config: &'a FetchConfig,
    selection: &'a [RemoteObject],
    cancel: &'a CancellationToken,
) -> impl Stream<Item = Outcome> + 'a {
    stream::iter(selection)
        .map(move |obj| async move {
            if cancel.is_cancelled() {
                return Outcome::Skipped;
            }
            let result = tokio::select! {
                _ = cancel.cancelled() => Err(Error::Cancelled),
                r = fetch_object(store, &config.bucket, obj, &config.output_root) => r,
            };
            match result {
                Ok(done) => Outcome::Done(done),
                Err(Error::Cancelled) => Outcome::Skipped,
                Err(e) => Outcome::Failed(obj.key.clone(), e),
            }
        })
        .buffer_unordered(config.jobs.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_display_reports_counts() {
        let summary = FetchSummary {
            selected: 3,
            succeeded: 2,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(summary.to_string(), "2 succeeded, 1 failed");

        let cancelled = FetchSummary { skipped: 4, ..summary };
        assert_eq!(cancelled.to_string(), "2 succeeded, 1 failed, 4 skipped");
    }
}
