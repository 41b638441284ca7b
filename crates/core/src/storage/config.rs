//! Storage configuration types.

use std::path::PathBuf;

use entryflow_shared::config::StorageSettings;

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    /// S3-compatible storage.
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Local filesystem (development only).
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "fs",
        }
    }
}

/// Image store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum image size in bytes.
    pub max_image_size: u64,
}

impl StorageConfig {
    /// Default max image size: 5MB.
    pub const DEFAULT_MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024;

    /// Create a new storage config with default limits.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_image_size: Self::DEFAULT_MAX_IMAGE_SIZE,
        }
    }

    /// Set maximum image size.
    #[must_use]
    pub fn with_max_image_size(mut self, size: u64) -> Self {
        self.max_image_size = size;
        self
    }

    /// Build from the `storage` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` for an unknown provider or
    /// when an S3 setting is missing.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let provider = match settings.provider.as_str() {
            "fs" => StorageProvider::local_fs(&settings.root),
            "s3" => {
                let field = |value: &Option<String>, name: &str| {
                    value.clone().ok_or_else(|| {
                        StorageError::configuration(format!("storage.{name} is required for s3"))
                    })
                };
                StorageProvider::S3 {
                    endpoint: field(&settings.endpoint, "endpoint")?,
                    bucket: field(&settings.bucket, "bucket")?,
                    access_key_id: field(&settings.access_key_id, "access_key_id")?,
                    secret_access_key: field(&settings.secret_access_key, "secret_access_key")?,
                    region: settings.region.clone().unwrap_or_else(|| "auto".to_string()),
                }
            }
            other => {
                return Err(StorageError::configuration(format!(
                    "unknown storage provider '{other}'"
                )));
            }
        };

        Ok(Self::new(provider).with_max_image_size(settings.max_image_size))
    }
}
