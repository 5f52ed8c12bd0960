use std::path::PathBuf;

/// Default bucket for submission attachments.
pub const DEFAULT_BUCKET: &str = "submission-files";

/// Default directory for the local backend.
const DEFAULT_LOCAL_ROOT: &str = "storage/submission-files";

/// Default public prefix for the local backend (served by the API at `/files`).
const DEFAULT_LOCAL_PUBLIC_BASE_URL: &str = "http://localhost:3000/files";

/// Which object-store backend to build, with its settings.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    S3 {
        bucket: String,
        /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
        endpoint: Option<String>,
        /// Public URL prefix for stored objects. Defaults to the
        /// virtual-hosted AWS bucket URL.
        public_base_url: Option<String>,
    },
    Local {
        root: PathBuf,
        public_base_url: String,
    },
}

/// Object storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default                          |
    /// |-------------------------|----------------------------------|
    /// | `STORAGE_BACKEND`       | `local` (`s3` or `local`)        |
    /// | `S3_BUCKET`             | `submission-files`               |
    /// | `S3_ENDPOINT`           | --                               |
    /// | `S3_PUBLIC_BASE_URL`    | `https://{bucket}.s3.amazonaws.com` |
    /// | `LOCAL_STORAGE_DIR`     | `storage/submission-files`       |
    /// | `LOCAL_PUBLIC_BASE_URL` | `http://localhost:3000/files`    |
    ///
    /// AWS credentials and region come from the standard AWS environment.
    ///
    /// # Panics
    ///
    /// Panics if `STORAGE_BACKEND` names an unknown backend.
    pub fn from_env() -> Self {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".into());

        let backend = match backend.trim().to_ascii_lowercase().as_str() {
            "s3" => StorageBackend::S3 {
                bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.into()),
                endpoint: std::env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
                public_base_url: std::env::var("S3_PUBLIC_BASE_URL")
                    .ok()
                    .filter(|s| !s.is_empty()),
            },
            "local" => StorageBackend::Local {
                root: std::env::var("LOCAL_STORAGE_DIR")
                    .unwrap_or_else(|_| DEFAULT_LOCAL_ROOT.into())
                    .into(),
                public_base_url: std::env::var("LOCAL_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_LOCAL_PUBLIC_BASE_URL.into()),
            },
            other => panic!("STORAGE_BACKEND must be 's3' or 'local', got '{other}'"),
        };

        Self { backend }
    }

    /// Local directory to serve publicly, when the local backend is active.
    pub fn local_root(&self) -> Option<&PathBuf> {
        match &self.backend {
            StorageBackend::Local { root, .. } => Some(root),
            StorageBackend::S3 { .. } => None,
        }
    }
}
