// src/s3_client.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Construction of the AWS S3 client from a [`StoreConfig`].
//!
//! Credentials are resolved by the SDK's default provider chain; this module
//! only decides region, endpoint, timeouts and TLS trust roots.

use anyhow::{Context, Result};
use aws_config::meta::region::RegionProviderChain;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_s3::{config::Region, Client};
use aws_smithy_http_client::tls;
use aws_smithy_http_client::tls::rustls_provider::CryptoMode;
use std::{fs, path::Path, time::Duration};
use tracing::debug;

use crate::config::StoreConfig;
use crate::constants::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REGION};


// -----------------------------------------------------------------------------
// TLS helper, for CA bundle
// -----------------------------------------------------------------------------

/// Create a TLS context using a CA bundle file
fn tls_context_from_pem(filename: impl AsRef<Path>) -> Result<tls::TlsContext> {
    let pem_contents = fs::read(&filename)
        .with_context(|| format!("Failed to read CA bundle file: {}", filename.as_ref().display()))?;

    let trust_store = tls::TrustStore::empty()
        .with_pem_certificate(pem_contents.as_slice());

    tls::TlsContext::builder()
        .with_trust_store(trust_store)
        .build()
        .with_context(|| format!("Failed to build TLS context from PEM {}", filename.as_ref().display()))
}


// -----------------------------------------------------------------------------
// Client factory
// -----------------------------------------------------------------------------

/// Build an S3 client. Called once per run; the client is cheap to clone.
pub async fn build_s3_client(config: &StoreConfig) -> Result<Client> {
    let region = RegionProviderChain::first_try(config.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(Region::new(DEFAULT_REGION));

    let mut loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = &config.endpoint_url {
        debug!("Using custom S3 endpoint {}", endpoint);
        loader = loader.endpoint_url(endpoint);
    }

    if let Some(ca_bundle_path) = &config.ca_bundle_path {
        debug!("Loading CA bundle from {}", ca_bundle_path.display());
        let tls_context = tls_context_from_pem(ca_bundle_path)?;
        let http_client = aws_smithy_http_client::Builder::new()
            .tls_provider(tls::Provider::Rustls(CryptoMode::AwsLc))
            .tls_context(tls_context)
            .build_https();
        loader = loader.http_client(http_client);
    }

    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .operation_timeout(config.operation_timeout)
        .build();

    let sdk_config = loader.timeout_config(timeout_config).load().await;

    // Virtual-hosted addressing (bucket.endpoint) does not resolve against
    // S3-compatible services behind a custom endpoint.
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.endpoint_url.is_some())
        .build();

    Ok(Client::from_conf(s3_config))
}
