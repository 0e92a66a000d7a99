//! OpenDAL Operator factory for the fragment store

use anyhow::{Context, Result};
use opendal::Operator;

use fragvault_core::config::StorageConfig;

/// Build an OpenDAL Operator for an S3-compatible endpoint.
///
/// Uses path-style addressing (the opendal default), which MinIO and
/// SeaweedFS require. No retry layer: a failed fragment operation fails
/// the whole upload/download by design.
///
/// If `enforce_tls` is set and the endpoint uses HTTP, this returns an
/// error; otherwise a plaintext endpoint only logs a warning.
pub fn build_operator(
    storage: &StorageConfig,
    access_key_id: &str,
    secret_access_key: &str,
) -> Result<Operator> {
    if storage.endpoint.starts_with("http://") {
        if storage.enforce_tls {
            anyhow::bail!(
                "S3 endpoint uses plaintext HTTP ({}), but enforce_tls is enabled. \
                 Use an HTTPS endpoint or set storage.enforce_tls = false for local development.",
                storage.endpoint
            );
        }
        tracing::warn!(
            endpoint = %storage.endpoint,
            "S3 endpoint uses plaintext HTTP — credentials and fragments are transmitted unencrypted"
        );
    }

    let builder = opendal::services::S3::default()
        .endpoint(&storage.endpoint)
        .region(&storage.region)
        .bucket(&storage.bucket)
        .access_key_id(access_key_id)
        .secret_access_key(secret_access_key);

    let op = Operator::new(builder)
        .context("creating OpenDAL S3 operator")?
        .layer(opendal::layers::LoggingLayer::default())
        .finish();

    Ok(op)
}
