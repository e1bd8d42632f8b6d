// src/catalog.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Exhaustive bucket listing.
//!
//! The inventory is all-or-nothing: a failure on any page discards what was
//! gathered so far, because sampling from a partial inventory would be biased.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};
use crate::object_store::{ObjectStore, RemoteObject};

/// List every object in `bucket`, following continuation tokens until the store reports no more pages.
pub async fn list_all(
    store: &dyn ObjectStore,
    bucket: &str,
    cancel: &CancellationToken,
) -> Result<Vec<RemoteObject>> {
    if bucket.trim().is_empty() {
        return Err(Error::EmptyBucket);
    }

    let mut inventory = Vec::new();
    let mut token: Option<String> = None;
    let mut page = 0usize;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        page += 1;

        let result = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            r = store.list_page(bucket, token.as_deref()) => r,
        };
        let listing = result.map_err(|source| Error::Listing {
            bucket: bucket.to_string(),
            page,
            source,
        })?;

        debug!(page, objects = listing.objects.len(), "listed page");
        inventory.extend(listing.objects);

        match listing.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(inventory)
}
