// src/object_store.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Pluggable object-store abstraction.
// Supported schemes: s3:// (or a bare bucket name) and file://

use std::pin::Pin;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncRead;

use crate::config::StoreConfig;

/// One object from a single listing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    /// Slash-delimited key, unique within the bucket.
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

impl RemoteObject {
    pub fn new(key: impl Into<String>, size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified,
        }
    }
}

/// One page of a listing. `next_token` is `None` once the store has no more pages.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub objects: Vec<RemoteObject>,
    pub next_token: Option<String>,
}

/// Streaming object body. Dropping it releases the underlying connection or file.
pub type ObjectBody = Pin<Box<dyn AsyncRead + Send>>;

/// The two capabilities the pipeline needs from a store.
///
/// Page size is decided by the implementation. `bucket` is passed through
/// unchanged from the run configuration, so implementations accept whatever
/// form [`infer_scheme`] routed to them.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the page following `continuation_token` (`None` for the first page).
    async fn list_page(&self, bucket: &str, continuation_token: Option<&str>) -> Result<ListPage>;

    /// Open the body of `key` for streaming.
    async fn get_body(&self, bucket: &str, key: &str) -> Result<ObjectBody>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    S3,
    File,
}

/// Route a bucket argument to a backend. Anything without `file://` is S3.
pub fn infer_scheme(bucket: &str) -> Scheme {
    if bucket.starts_with("file://") { Scheme::File } else { Scheme::S3 }
}

/// Strip `s3://` and trailing slashes so `s3://media/` and `media` name the same bucket.
pub fn normalize_bucket(bucket: &str) -> &str {
    bucket
        .strip_prefix("s3://")
        .unwrap_or(bucket)
        .trim_end_matches('/')
}

/// Build the store for `bucket`. Fails only on setup problems (bad CA bundle, empty name).
pub async fn store_for_bucket(bucket: &str, config: &StoreConfig) -> Result<Arc<dyn ObjectStore>> {
    match infer_scheme(bucket) {
        Scheme::File => Ok(Arc::new(crate::file_store::FileSystemObjectStore::new())),
        Scheme::S3 => {
            if normalize_bucket(bucket).is_empty() {
                bail!("bucket name must not be empty");
            }
            let store = crate::s3_utils::S3ObjectStore::from_config(config).await?;
            Ok(Arc::new(store))
        }
    }
}
