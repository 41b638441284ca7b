//! Ledger error types for credit spend and allocation.
//!
//! This module defines all errors that can occur during ledger operations,
//! including validation errors, missing accounts, balance errors,
//! and uniqueness violations when provisioning retailers.

use std::fmt;

use entryflow_shared::AppError;
use thiserror::Error;

use crate::validation::MissingField;

/// Profile field that collided with an existing account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    /// Username already taken.
    Username,
    /// Mobile number already registered.
    Mobile,
    /// Email already registered.
    Email,
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Username => "username",
            Self::Mobile => "mobile",
            Self::Email => "email",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Input rejected before any transaction was opened.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Allocation amount must be positive.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    // ========== Account Errors ==========
    /// Account not found (spend and refund subject).
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Distributor not found.
    #[error("Distributor not found: {0}")]
    DistributorNotFound(String),

    /// Retailer not found by username or mobile.
    #[error("Retailer not found: {0}")]
    RetailerNotFound(String),

    /// An account with the same username, mobile, or email exists.
    #[error("Account already exists with {field}")]
    DuplicateAccount {
        /// The colliding profile field.
        field: DuplicateField,
    },

    // ========== Balance Errors ==========
    /// Spend or allocation exceeds available credit.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Credit available before the operation.
        available: i64,
        /// Credit the operation needed.
        requested: i64,
    },

    /// Balance arithmetic left the representable range.
    #[error("Balance overflow")]
    Overflow,

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::DistributorNotFound(_) => "DISTRIBUTOR_NOT_FOUND",
            Self::RetailerNotFound(_) => "RETAILER_NOT_FOUND",
            Self::DuplicateAccount { .. } => "DUPLICATE_ACCOUNT",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::Overflow => "BALANCE_OVERFLOW",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::Validation(_) | Self::InvalidAmount(_) => 400,

            // 402 Payment Required - out of credit
            Self::InsufficientBalance { .. } => 402,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::DistributorNotFound(_) | Self::RetailerNotFound(_) => {
                404
            }

            // 409 Conflict - uniqueness
            Self::DuplicateAccount { .. } => 409,

            // 500 Internal Server Error
            Self::Overflow | Self::Database(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

impl From<MissingField> for LedgerError {
    fn from(err: MissingField) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::Validation(_) | LedgerError::InvalidAmount(_) => Self::Validation(message),
            LedgerError::AccountNotFound(_)
            | LedgerError::DistributorNotFound(_)
            | LedgerError::RetailerNotFound(_) => Self::NotFound(message),
            LedgerError::DuplicateAccount { .. } => Self::DuplicateAccount(message),
            LedgerError::InsufficientBalance { .. } => Self::InsufficientBalance(message),
            LedgerError::Overflow => Self::Internal(message),
            LedgerError::Database(_) => Self::Storage(message),
        }
    }
}
