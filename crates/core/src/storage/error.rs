//! Storage error types.

use entryflow_shared::AppError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Upload carried no bytes.
    #[error("image is empty")]
    EmptyImage,

    /// Image size exceeds maximum allowed.
    #[error("image size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Actual size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Object not found in storage.
    #[error("image not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// Invalid storage key format.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyImage | Self::InvalidKey(_) => 400,
            Self::FileTooLarge { .. } => 413,
            Self::NotFound { .. } => 404,
            Self::Configuration(_) | Self::Operation(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyImage => "EMPTY_IMAGE",
            Self::FileTooLarge { .. } => "IMAGE_TOO_LARGE",
            Self::NotFound { .. } => "IMAGE_NOT_FOUND",
            Self::InvalidKey(_) => "INVALID_STORAGE_KEY",
            Self::Configuration(_) | Self::Operation(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true for backend failures the caller may retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Operation(_))
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let message = err.to_string();
        match err {
            StorageError::EmptyImage
            | StorageError::FileTooLarge { .. }
            | StorageError::InvalidKey(_) => Self::Validation(message),
            StorageError::NotFound { .. } => Self::NotFound(message),
            StorageError::Configuration(_) => Self::Internal(message),
            StorageError::Operation(_) => Self::Storage(message),
        }
    }
}
