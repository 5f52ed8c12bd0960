//! Object storage for submission attachments.
//!
//! [`ObjectStore`] is the seam the intake endpoint writes through. Two
//! backends are provided:
//!
//! - [`S3ObjectStore`] -- any S3-compatible bucket via `aws-sdk-s3`.
//! - [`LocalObjectStore`] -- a directory on disk, for development and tests.
//!
//! Both return a public URL for every stored key; the bucket or directory
//! must be served publicly for those URLs to resolve.

use std::sync::Arc;

use async_trait::async_trait;

pub mod config;
pub mod local;
pub mod s3;

pub use config::{StorageBackend, StorageConfig};
pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;

/// Error type for object-storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem failure in the local backend.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The S3 service rejected or failed the request.
    #[error("S3 error: {0}")]
    S3(String),

    /// The key would escape the store's namespace.
    #[error("Invalid object key '{0}'")]
    InvalidKey(String),
}

/// A binary object store that hands back publicly retrievable URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, overwriting any existing object.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Public URL at which `key` can be retrieved once stored.
    fn public_url(&self, key: &str) -> String;
}

/// Construct the configured backend.
pub async fn build_object_store(config: &StorageConfig) -> Arc<dyn ObjectStore> {
    match &config.backend {
        StorageBackend::S3 {
            bucket,
            endpoint,
            public_base_url,
        } => {
            let store =
                S3ObjectStore::connect(bucket, endpoint.as_deref(), public_base_url.as_deref())
                    .await;
            tracing::info!(bucket = %bucket, "S3 object store configured");
            Arc::new(store)
        }
        StorageBackend::Local {
            root,
            public_base_url,
        } => {
            tracing::info!(root = %root.display(), "Local object store configured");
            Arc::new(LocalObjectStore::new(root.clone(), public_base_url.clone()))
        }
    }
}

/// Reject keys that are empty or contain `..`, empty or absolute segments.
pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        Err(StorageError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}

/// Percent-encode an object key for use in a URL path, keeping `/`.
pub(crate) fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

/// Join a base URL and an encoded key with exactly one slash.
pub(crate) fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), encode_key(key))
}
