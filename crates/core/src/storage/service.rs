//! Image store implementation using Apache OpenDAL.

use opendal::{ErrorKind, Operator, services};
use tracing::{debug, error};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Blob store for entry images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    operator: Operator,
    config: StorageConfig,
}

impl ImageStore {
    /// Prefix for every entry image key.
    pub const PREFIX: &'static str = "entries";

    /// Create a new image store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Storage key for an entry image.
    ///
    /// Format: `entries/{sanitized_document_number}.png`. One image per
    /// document; a resend overwrites the previous object.
    pub fn image_key(document_number: &str) -> Result<String, StorageError> {
        let name = sanitize_filename(document_number.trim());
        if name.is_empty() || name.chars().all(|c| c == '.') {
            return Err(StorageError::InvalidKey(document_number.to_string()));
        }
        Ok(format!("{}/{name}.png", Self::PREFIX))
    }

    /// Check the image against the configured limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is empty or too large.
    pub fn validate_image(&self, size: u64) -> Result<(), StorageError> {
        if size == 0 {
            return Err(StorageError::EmptyImage);
        }
        if size > self.config.max_image_size {
            return Err(StorageError::FileTooLarge {
                size,
                max: self.config.max_image_size,
            });
        }
        Ok(())
    }

    /// Write the image for an entry and return its storage path.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the backend write fails.
    pub async fn put_entry_image(
        &self,
        document_number: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        self.validate_image(bytes.len() as u64)?;
        let key = Self::image_key(document_number)?;

        self.operator.write(&key, bytes).await.map_err(|e| {
            error!(key = %key, error = %e, "Image write failed");
            StorageError::from(e)
        })?;

        debug!(key = %key, provider = self.provider_name(), "Stored entry image");
        Ok(key)
    }

    /// Read an image by storage path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing is stored under `key`.
    pub async fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.check_key(key)?;
        match self.operator.read(key).await {
            Ok(buffer) => Ok(buffer.to_vec()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if an image exists.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.stat(key).await.is_ok()
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    // Reads and deletes stay inside the entry image prefix.
    fn check_key(&self, key: &str) -> Result<(), StorageError> {
        let inside = key
            .strip_prefix(Self::PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/') && !rest.contains(".."));
        if inside {
            Ok(())
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

/// Sanitize a name for use in a storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
