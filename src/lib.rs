// src/lib.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Crate root — public re-exports.
//
// Two flows share the catalog reader:
//   fetch: catalog -> presence -> sampler -> download
//   list:  catalog -> report

pub mod constants;
pub mod config;
pub mod error;
pub mod progress;

// Stores
pub mod object_store;
pub mod s3_client;
pub mod s3_utils;
pub mod file_store;

// Pipeline stages
pub mod catalog;
pub mod presence;
pub mod sampler;
pub mod download;
pub mod fetch;
pub mod report;

pub use config::{FetchConfig, ListConfig, StoreConfig};
pub use error::{Error, Result};

pub use object_store::{
    ObjectStore,
    ObjectBody,
    ListPage,
    RemoteObject,
    infer_scheme,
    normalize_bucket,
    store_for_bucket,
    Scheme,
};
pub use s3_utils::S3ObjectStore;
pub use file_store::FileSystemObjectStore;

pub use catalog::list_all;
pub use presence::{filter_missing, local_path};
pub use sampler::select_random;
pub use download::{fetch_object, Materialized};
pub use fetch::{fetch_random, FetchObserver, FetchSummary};
pub use report::{format_size_mb, format_timestamp, report};
