//
// Copyright, 2025.  Signal65 / Futurum Group.
// 
// src/s3_utils.rs
//! S3 implementation of [`ObjectStore`]: `ListObjectsV2` pages and streaming `GetObject`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::DateTime as AwsDateTime;
use aws_sdk_s3::types::Object;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::StoreConfig;
use crate::object_store::{normalize_bucket, ListPage, ObjectBody, ObjectStore, RemoteObject};
use crate::s3_client::build_s3_client;

/// S3 adapter over a single SDK client.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(build_s3_client(config).await?))
    }
}

/// Convert the SDK timestamp, falling back to the epoch for out-of-range values.
fn to_chrono(ts: &AwsDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()).unwrap_or_default()
}

fn to_remote_object(obj: &Object) -> Option<RemoteObject> {
    let key = obj.key()?;
    Some(RemoteObject {
        key: key.to_owned(),
        // S3 reports sizes as i64; negative values never occur in practice.
        size: obj.size().unwrap_or(0).max(0) as u64,
        last_modified: obj.last_modified().map(to_chrono).unwrap_or_default(),
    })
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_page(&self, bucket: &str, continuation_token: Option<&str>) -> Result<ListPage> {
        let bucket = normalize_bucket(bucket);
        let mut req = self.client.list_objects_v2().bucket(bucket);
        if let Some(token) = continuation_token {
            req = req.continuation_token(token);
        }
        let resp = req.send().await.context("list_objects_v2 failed")?;

        let objects: Vec<RemoteObject> = resp.contents().iter().filter_map(to_remote_object).collect();
        let next_token = resp.next_continuation_token().map(str::to_owned);
        debug!("list_objects_v2 page from {}: {} objects, more={}", bucket, objects.len(), next_token.is_some());

        Ok(ListPage { objects, next_token })
    }

    async fn get_body(&self, bucket: &str, key: &str) -> Result<ObjectBody> {
        let resp = self
            .client
            .get_object()
            .bucket(normalize_bucket(bucket))
            .key(key)
            .send()
            .await
            .context("get_object failed")?;
        Ok(Box::pin(resp.body.into_async_read()))
    }
}
