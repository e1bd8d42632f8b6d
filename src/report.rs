// src/report.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Human-readable listing of objects whose key ends with a suffix.

use chrono::{DateTime, Utc};

use crate::constants::{BYTES_PER_MB, LIST_KEY_WIDTH, TIMESTAMP_FORMAT};
use crate::object_store::RemoteObject;

/// Size in megabytes (1 MB = 1,048,576 bytes), fractional part kept.
pub fn size_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// `1048576` -> `"1.00 MB"`
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", size_mb(bytes))
}

/// `2024-12-20T15:04:05Z` -> `"2024-12-20 15:04:05"`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// One listing line: key padded to a fixed column, size, timestamp.
pub fn format_line(obj: &RemoteObject) -> String {
    format!(
        "{:<width$}  {:>8.2} MB  {}",
        obj.key,
        size_mb(obj.size),
        format_timestamp(&obj.last_modified),
        width = LIST_KEY_WIDTH,
    )
}

/// Lazily filter `objects` by key suffix and format each match.
///
/// Single pass, in input order; objects that do not match are dropped.
pub fn report<'a, I>(objects: I, suffix: &'a str) -> impl Iterator<Item = String> + 'a
where
    I: IntoIterator<Item = &'a RemoteObject>,
    I::IntoIter: 'a,
{
    objects
        .into_iter()
        .filter(move |obj| obj.key.ends_with(suffix))
        .map(format_line)
}
