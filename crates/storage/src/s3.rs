use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use crate::{check_key, join_url, ObjectStore, StorageError};

/// S3-compatible bucket backend.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build a client from the ambient AWS configuration.
    ///
    /// `endpoint` switches to path-style addressing against a custom
    /// S3-compatible service.
    pub async fn connect(bucket: &str, endpoint: Option<&str>, public_base_url: Option<&str>) -> Self {
        let shared = aws_config::load_from_env().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = aws_sdk_s3::Client::from_conf(builder.build());

        let public_base_url = public_base_url
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://{bucket}.s3.amazonaws.com"));

        Self {
            client,
            bucket: bucket.to_string(),
            public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        check_key(key)?;
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        tracing::debug!(bucket = %self.bucket, key, size, "Object uploaded");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }
}
