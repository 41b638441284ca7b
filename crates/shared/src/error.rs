//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Domain errors from `entryflow-core` collapse into these kinds at the
/// boundary to whatever transport sits in front of the engine.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced account or entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Spend or allocation exceeds available credit.
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    /// Account uniqueness violation on create.
    #[error("Duplicate account: {0}")]
    DuplicateAccount(String),

    /// Illegal state transition.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database or blob storage failure.
    #[error("Storage failure: {0}")]
    Storage(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InsufficientBalance(_) => 402,
            Self::NotFound(_) => 404,
            Self::DuplicateAccount(_) | Self::Conflict(_) => 409,
            Self::Storage(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InsufficientBalance(_) => "INSUFFICIENT_BALANCE",
            Self::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_FAILURE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may retry the operation.
    ///
    /// Business-rule failures are final; only storage failures are retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::InsufficientBalance(String::new()), 402, "INSUFFICIENT_BALANCE")]
    #[case(AppError::DuplicateAccount(String::new()), 409, "DUPLICATE_ACCOUNT")]
    #[case(AppError::Conflict(String::new()), 409, "CONFLICT")]
    #[case(AppError::Storage(String::new()), 500, "STORAGE_FAILURE")]
    #[case(AppError::Internal(String::new()), 500, "INTERNAL_ERROR")]
    fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_only_storage_is_retryable() {
        assert!(AppError::Storage("timeout".into()).is_retryable());
        assert!(!AppError::InsufficientBalance("r1".into()).is_retryable());
        assert!(!AppError::NotFound("r1".into()).is_retryable());
        assert!(!AppError::DuplicateAccount("r1".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::InsufficientBalance("msg".into()).to_string(),
            "Insufficient balance: msg"
        );
        assert_eq!(
            AppError::DuplicateAccount("msg".into()).to_string(),
            "Duplicate account: msg"
        );
        assert_eq!(
            AppError::Storage("msg".into()).to_string(),
            "Storage failure: msg"
        );
    }
}
