// src/download.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Materializes one remote object at its mapped local path.
//
// The body is streamed into a temporary file in the destination directory,
// synced, then renamed over the target, so readers never observe a partial
// file. Every handle is dropped on every exit path; an unpersisted temporary
// file deletes itself on drop.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{Error, Result};
use crate::object_store::{ObjectStore, RemoteObject};
use crate::presence::local_path;

/// Outcome of one successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub key: String,
    pub path: PathBuf,
    pub bytes_written: u64,
}

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Download `object` from `bucket` into `output_root`, creating parent directories as needed.
pub async fn fetch_object(
    store: &dyn ObjectStore,
    bucket: &str,
    object: &RemoteObject,
    output_root: &Path,
) -> Result<Materialized> {
    let key = object.key.as_str();
    let path = local_path(output_root, key)?;
    let parent = path.parent().unwrap_or(output_root).to_path_buf();
    info!(key, to = %path.display(), "Downloading file");

    fs::create_dir_all(&parent).await.map_err(write_err(&parent))?;

    let mut body = store.get_body(bucket, key).await.map_err(|source| Error::Fetch {
        key: key.to_string(),
        source,
    })?;

    let tmp = tempfile::Builder::new()
        .prefix(".s3sample-")
        .suffix(".part")
        .tempfile_in(&parent)
        .map_err(write_err(&parent))?;
    let (std_file, tmp_path) = tmp.into_parts();
    let mut file = fs::File::from_std(std_file);

    let written = tokio::io::copy(&mut body, &mut file)
        .await
        .map_err(|source| Error::Transfer {
            key: key.to_string(),
            source,
        })?;
    drop(body);

    file.flush().await.map_err(write_err(&path))?;
    file.sync_all().await.map_err(write_err(&path))?;
    drop(file);

    tmp_path.persist(&path).map_err(|e| Error::Write {
        path: path.clone(),
        source: e.error,
    })?;

    info!(key, to = %path.display(), size_bytes = written, "Downloaded file");
    Ok(Materialized {
        key: key.to_string(),
        path,
        bytes_written: written,
    })
}
