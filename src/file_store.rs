// src/file_store.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// FileSystemObjectStore: a local directory tree served through the ObjectStore interface.
//
// URI Mapping:
// - `file:///absolute/path` -> `/absolute/path` is the bucket root
// - `file://./relative/path` -> `./relative/path`
//
// Keys are paths relative to the root with `/` separators, listed in lexical
// order. The continuation token is the last key of the previous page.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::constants::DEFAULT_FILE_PAGE_SIZE;
use crate::object_store::{ListPage, ObjectBody, ObjectStore, RemoteObject};

#[derive(Debug, Clone)]
pub struct FileSystemObjectStore {
    page_size: usize,
}

impl Default for FileSystemObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemObjectStore {
    pub fn new() -> Self {
        Self { page_size: DEFAULT_FILE_PAGE_SIZE }
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self { page_size: page_size.max(1) }
    }
}

/// Resolve a `file://` bucket argument to its root directory.
pub fn root_from_uri(uri: &str) -> Result<PathBuf> {
    let Some(path) = uri.strip_prefix("file://") else {
        bail!("FileSystemObjectStore expected file:// URI, got {uri}");
    };
    if path.is_empty() {
        bail!("file:// URI has no path");
    }
    Ok(PathBuf::from(path))
}

/// Key of `path` relative to `root`, or `None` when any component is not UTF-8.
fn key_for(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    if parts.is_none() {
        debug!(path = %path.display(), "Skipping file with a non-UTF-8 name");
    }
    parts.map(|p| p.join("/"))
}

/// Walk `root` and return every regular file as an object, sorted by key.
fn scan_tree(root: &Path) -> Result<Vec<RemoteObject>> {
    let mut objects = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir)
            .with_context(|| format!("failed to read directory {}", dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                let meta = entry.metadata()?;
                let Some(key) = key_for(root, &path) else { continue };
                let last_modified: DateTime<Utc> = meta.modified().map(DateTime::from).unwrap_or_default();
                objects.push(RemoteObject::new(key, meta.len(), last_modified));
            }
        }
    }

    objects.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(objects)
}

#[async_trait]
impl ObjectStore for FileSystemObjectStore {
    async fn list_page(&self, bucket: &str, continuation_token: Option<&str>) -> Result<ListPage> {
        let root = root_from_uri(bucket)?;
        if !fs::metadata(&root).await.map(|m| m.is_dir()).unwrap_or(false) {
            bail!("bucket root {} is not a directory", root.display());
        }

        let scan_root = root.clone();
        let all = tokio::task::spawn_blocking(move || scan_tree(&scan_root))
            .await
            .context("directory scan task failed")??;

        let start = match continuation_token {
            Some(token) => all.partition_point(|o| o.key.as_str() <= token),
            None => 0,
        };
        let end = (start + self.page_size).min(all.len());
        let objects = all[start..end].to_vec();
        let next_token = if end < all.len() {
            objects.last().map(|o| o.key.clone())
        } else {
            None
        };

        Ok(ListPage { objects, next_token })
    }

    async fn get_body(&self, bucket: &str, key: &str) -> Result<ObjectBody> {
        let root = root_from_uri(bucket)?;
        let path = crate::presence::local_path(&root, key)?;
        let file = fs::File::open(&path)
            .await
            .with_context(|| format!("failed to open {}", path.display()))?;
        Ok(Box::pin(file))
    }
}
