// tests/common/mod.rs
//
// In-memory ObjectStore used by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use s3sample::{ListPage, ObjectBody, ObjectStore, RemoteObject};

/// Store with fixed pages and per-key bodies. Tokens are page indexes.
#[derive(Default)]
pub struct MockStore {
    pub pages: Vec<Vec<RemoteObject>>,
    pub bodies: HashMap<String, Vec<u8>>,
    /// `get_body` fails for these keys.
    pub failing_keys: HashSet<String>,
    /// `list_page` fails when asked for this page index.
    pub failing_page: Option<usize>,
    pub page_requests: Mutex<Vec<Option<String>>>,
    pub get_requests: Mutex<Vec<String>>,
}

impl MockStore {
    /// One object per key, `page_size` objects per page, body = key bytes.
    pub fn with_keys(keys: &[&str], page_size: usize) -> Self {
        let objects: Vec<RemoteObject> = keys.iter().map(|k| object(k, k.len() as u64)).collect();
        let pages = objects.chunks(page_size.max(1)).map(|c| c.to_vec()).collect();
        let bodies = keys.iter().map(|k| (k.to_string(), k.as_bytes().to_vec())).collect();
        Self { pages, bodies, ..Default::default() }
    }

    pub fn fail_key(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    pub fn fail_page(mut self, page: usize) -> Self {
        self.failing_page = Some(page);
        self
    }

    pub fn gets(&self) -> Vec<String> {
        self.get_requests.lock().unwrap().clone()
    }

    pub fn page_calls(&self) -> usize {
        self.page_requests.lock().unwrap().len()
    }
}

pub fn object(key: &str, size: u64) -> RemoteObject {
    RemoteObject::new(key, size, Utc.with_ymd_and_hms(2024, 12, 20, 15, 4, 5).unwrap())
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn list_page(&self, _bucket: &str, continuation_token: Option<&str>) -> Result<ListPage> {
        self.page_requests.lock().unwrap().push(continuation_token.map(str::to_owned));
        let index: usize = match continuation_token {
            Some(t) => t.parse()?,
            None => 0,
        };
        if self.failing_page == Some(index) {
            bail!("simulated listing failure on page {index}");
        }
        let objects = self.pages.get(index).cloned().unwrap_or_default();
        let next_token = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(ListPage { objects, next_token })
    }

    async fn get_body(&self, _bucket: &str, key: &str) -> Result<ObjectBody> {
        self.get_requests.lock().unwrap().push(key.to_string());
        if self.failing_keys.contains(key) {
            bail!("simulated transport error for {key}");
        }
        let body = self
            .bodies
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("NoSuchKey: {key}"))?;
        Ok(Box::pin(Cursor::new(body)))
    }
}
