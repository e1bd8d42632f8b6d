// src/error.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Error type shared by the listing, filtering and fetch stages.
//!
//! Fatal-class errors (`EmptyBucket`, `Listing`, `Probe`, `Cancelled` during
//! listing) abort a run. Objects whose key raises `InvalidKey` are left out of
//! the candidate set. Per-object errors (`Fetch`, `Transfer`, `Write`) are
//! reported by the orchestrator and the run goes on.

use std::io;
use std::path::PathBuf;

use anyhow::Error as AnyError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("bucket name must not be empty")]
    EmptyBucket,

    #[error("error listing objects in {bucket} (page {page}): {source:#}")]
    Listing {
        bucket: String,
        page: usize,
        #[source]
        source: AnyError,
    },

    #[error("object key {0:?} does not map to a path under the output directory")]
    InvalidKey(String),

    #[error("unable to check local path {}: {source}", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to get object {key}: {source:#}")]
    Fetch {
        key: String,
        #[source]
        source: AnyError,
    },

    #[error("failed to copy object {key} to disk: {source}")]
    Transfer {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// True for errors scoped to a single object; the fetch flow logs these and continues.
    pub fn is_per_object(&self) -> bool {
        matches!(
            self,
            Error::Fetch { .. } | Error::Transfer { .. } | Error::Write { .. }
        )
    }
}
