//! Workflow error types for the entry lifecycle.
//!
//! This module defines all error types that can occur during
//! workflow operations such as submissions, status transitions,
//! image uploads, and rejections with refunds.

use entryflow_shared::AppError;
use thiserror::Error;

use crate::ledger::LedgerError;
use crate::storage::StorageError;
use crate::validation::MissingField;
use crate::workflow::types::EntryStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Input rejected before any transaction was opened.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No entry matches the given key or id.
    #[error("Entry {0} not found")]
    EntryNotFound(String),

    /// An entry with the same document and contact number exists.
    #[error("Entry {0} already exists")]
    DuplicateEntry(String),

    /// The action is not in the transition table for the current status.
    #[error("Cannot {action} an entry in status {from}")]
    InvalidTransition {
        /// The current status.
        from: EntryStatus,
        /// The attempted action.
        action: &'static str,
    },

    /// A replacement image was sent for an entry without one.
    #[error("Entry {0} has no image to replace")]
    NoImageToReplace(String),

    /// Credit ledger failure (balance, missing account).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Image storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<MissingField> for WorkflowError {
    fn from(err: MissingField) -> Self {
        Self::Validation(err.to_string())
    }
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::EntryNotFound(_) => 404,
            Self::DuplicateEntry(_) | Self::InvalidTransition { .. } | Self::NoImageToReplace(_) => {
                409
            }
            Self::Ledger(err) => err.http_status_code(),
            Self::Storage(err) => err.status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::DuplicateEntry(_) => "DUPLICATE_ENTRY",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NoImageToReplace(_) => "NO_IMAGE_TO_REPLACE",
            Self::Ledger(err) => err.error_code(),
            Self::Storage(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if the caller may retry the operation.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(err) => err.is_retryable(),
            Self::Storage(err) => err.is_retryable(),
            Self::Database(_) => true,
            _ => false,
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::Validation(_) => Self::Validation(message),
            WorkflowError::EntryNotFound(_) => Self::NotFound(message),
            WorkflowError::DuplicateEntry(_)
            | WorkflowError::InvalidTransition { .. }
            | WorkflowError::NoImageToReplace(_) => Self::Conflict(message),
            WorkflowError::Ledger(err) => err.into(),
            WorkflowError::Storage(err) => err.into(),
            WorkflowError::Database(_) => Self::Storage(message),
        }
    }
}
