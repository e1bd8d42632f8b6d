// src/progress.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Terminal progress bar for the fetch flow.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::constants::BYTES_PER_MB;
use crate::download::Materialized;
use crate::error::Error;
use crate::fetch::FetchObserver;

/// Byte-based progress bar, sized once the selection is known.
pub struct ProgressTracker {
    progress_bar: ProgressBar,
    total_objects: AtomicU64,
    objects_completed: AtomicU64,
    bytes_transferred: AtomicU64,
    started: Instant,
}

impl ProgressTracker {
    pub fn new(operation: &str) -> Self {
        let pb = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template(&format!(
                "{}: {{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, ETA: {{eta}}) {{msg}}",
                operation
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            progress_bar: pb,
            total_objects: AtomicU64::new(0),
            objects_completed: AtomicU64::new(0),
            bytes_transferred: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    fn record_completion(&self, bytes: u64) {
        let completed = self.objects_completed.fetch_add(1, Ordering::Relaxed) + 1;
        let transferred = self.bytes_transferred.fetch_add(bytes, Ordering::Relaxed) + bytes;
        let total = self.total_objects.load(Ordering::Relaxed);
        // Listed sizes can be stale; never let the bar run past its end.
        if transferred > self.progress_bar.length().unwrap_or(0) {
            self.progress_bar.set_length(transferred);
        }
        self.progress_bar.set_position(transferred);
        self.progress_bar.set_message(format!("{}/{} objects", completed, total));
    }

    /// Finish the bar with a throughput summary.
    pub fn finish(&self, operation: &str) {
        let total_bytes = self.bytes_transferred.load(Ordering::Relaxed);
        let secs = self.started.elapsed().as_secs_f64().max(f64::EPSILON);
        let mb = total_bytes as f64 / BYTES_PER_MB;
        self.progress_bar.finish_with_message(format!(
            "{} complete! {:.2} MB in {:.2}s ({:.2} MB/s)",
            operation,
            mb,
            secs,
            mb / secs
        ));
    }
}

impl FetchObserver for ProgressTracker {
    fn on_selected(&self, objects: usize, total_bytes: u64) {
        self.total_objects.store(objects as u64, Ordering::Relaxed);
        self.progress_bar.set_length(total_bytes);
        self.progress_bar.set_message(format!("0/{} objects", objects));
    }

    fn on_object_done(&self, done: &Materialized) {
        self.record_completion(done.bytes_written);
    }

    fn on_object_failed(&self, key: &str, err: &Error) {
        self.progress_bar.println(format!("failed: {key}: {err}"));
        self.record_completion(0);
    }
}
