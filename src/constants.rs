// src/constants.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Centralized constants for s3sample to avoid hardcoded values throughout the codebase

/// Region used when neither `AWS_REGION` nor the default provider chain yields one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default per-operation timeout for store requests (seconds)
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 120;

/// Connect timeout for store requests (seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Suffix matched by the `list` command when none is given
pub const DEFAULT_LIST_SUFFIX: &str = ".txt";

/// Number of objects fetched by `fetch random` when `--count` is omitted
pub const DEFAULT_FETCH_COUNT: usize = 1;

/// Maximum concurrent object fetches; 1 keeps the materializer sequential
pub const DEFAULT_FETCH_JOBS: usize = 1;

/// Keys returned per page by the filesystem store (mirrors the S3 ListObjectsV2 limit)
pub const DEFAULT_FILE_PAGE_SIZE: usize = 1000;

/// Bytes per megabyte used for human-readable sizes
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Layout for last-modified timestamps in listings
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Width of the key column in listings
pub const LIST_KEY_WIDTH: usize = 60;

/// Config file looked up in the home directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = ".s3sample.yaml";

// ============================================================================
// Environment variables
// ============================================================================

/// Bucket used when `--bucket` is not given
pub const ENV_BUCKET: &str = "S3SAMPLE_BUCKET";

/// Override for [`DEFAULT_OPERATION_TIMEOUT_SECS`]
pub const ENV_OPERATION_TIMEOUT_SECS: &str = "S3SAMPLE_OPERATION_TIMEOUT_SECS";

/// PEM bundle with extra trust roots for TLS to the store endpoint
pub const ENV_CA_BUNDLE_PATH: &str = "AWS_CA_BUNDLE_PATH";

pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";
