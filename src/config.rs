// src/config.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Immutable run parameters. Each flow receives its own config by reference;
// nothing here is global.
//
// Global CLI settings are layered: YAML config file, then environment, then flags.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_FETCH_COUNT, DEFAULT_FETCH_JOBS, DEFAULT_LIST_SUFFIX,
    DEFAULT_OPERATION_TIMEOUT_SECS, DEFAULT_REGION, ENV_CA_BUNDLE_PATH, ENV_ENDPOINT_URL,
    ENV_OPERATION_TIMEOUT_SECS, ENV_REGION,
};

/// Log line format on stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Contents of the YAML config file. Every key is optional.
///
/// ```yaml
/// bucket: media
/// verbose: 1
/// log-format: json
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileSettings {
    pub bucket:     Option<String>,
    pub verbose:    Option<u8>,
    #[serde(alias = "log_format")]
    pub log_format: Option<LogFormat>,
}

impl FileSettings {
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid config file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Load `explicit` if given (it must exist), else `fallback` if it exists.
    ///
    /// Returns the settings and the file they came from, if any.
    pub fn discover(explicit: Option<&Path>, fallback: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        match fallback {
            Some(path) if path.is_file() => Ok((Self::load(path)?, Some(path.to_path_buf()))),
            _ => Ok((Self::default(), None)),
        }
    }
}

/// `$HOME/.s3sample.yaml`, when a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(|h| PathBuf::from(h).join(DEFAULT_CONFIG_FILE))
}

/// Bucket, verbosity and log format after layering file, environment and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSettings {
    pub bucket:     Option<String>,
    pub verbose:    u8,
    pub log_format: LogFormat,
}

impl GlobalSettings {
    /// Flags beat the environment, which beats the file. A `-v` count of zero
    /// and blank bucket names count as unset.
    pub fn layer(
        file: FileSettings,
        env_bucket: Option<String>,
        flag_bucket: Option<String>,
        flag_verbose: u8,
        flag_log_format: Option<LogFormat>,
    ) -> Self {
        let set = |b: Option<String>| b.filter(|b| !b.trim().is_empty());
        Self {
            bucket: set(flag_bucket).or_else(|| set(env_bucket)).or_else(|| set(file.bucket)),
            verbose: if flag_verbose > 0 { flag_verbose } else { file.verbose.unwrap_or(0) },
            log_format: flag_log_format.or(file.log_format).unwrap_or_default(),
        }
    }
}

/// Connection settings for the remote store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Explicit region; `None` defers to the SDK provider chain, then [`DEFAULT_REGION`].
    pub region:            Option<String>,
    /// Custom endpoint (MinIO, Ceph, ...). Setting one forces path-style addressing.
    pub endpoint_url:      Option<String>,
    pub ca_bundle_path:    Option<PathBuf>,
    pub operation_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            region:            None,
            endpoint_url:      None,
            ca_bundle_path:    None,
            operation_timeout: Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS),
        }
    }
}

impl StoreConfig {
    /// Read settings from the environment. Empty variables count as unset.
    pub fn from_env() -> Self {
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

        let operation_timeout = non_empty(ENV_OPERATION_TIMEOUT_SECS)
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS));

        Self {
            region: non_empty(ENV_REGION),
            endpoint_url: non_empty(ENV_ENDPOINT_URL),
            ca_bundle_path: non_empty(ENV_CA_BUNDLE_PATH).map(PathBuf::from),
            operation_timeout,
        }
    }

    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}

/// Parameters of one `fetch random` run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub bucket:      String,
    pub output_root: PathBuf,
    pub count:       usize,
    /// Upper bound on concurrent object fetches (clamped to at least 1).
    pub jobs:        usize,
}

impl FetchConfig {
    pub fn new(bucket: impl Into<String>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            bucket: bucket.into(),
            output_root: output_root.into(),
            count: DEFAULT_FETCH_COUNT,
            jobs: DEFAULT_FETCH_JOBS,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }
}

/// Parameters of one `list` run.
#[derive(Debug, Clone)]
pub struct ListConfig {
    pub bucket: String,
    pub suffix: String,
}

impl ListConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            suffix: DEFAULT_LIST_SUFFIX.to_string(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}
