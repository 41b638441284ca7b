//! Input validation for ledger requests.
//!
//! Everything here runs before a database transaction is opened.

use crate::validation::require;

use super::error::LedgerError;
use super::types::{AllocateInput, CreateRetailerInput, RetailerProfile};

/// Validates a retailer profile.
///
/// # Errors
///
/// Returns `LedgerError::Validation` for missing fields or a malformed email.
pub fn validate_profile(profile: &RetailerProfile) -> Result<(), LedgerError> {
    require("username", &profile.username)?;
    require("password", &profile.password)?;
    require("name", &profile.name)?;
    require("mobile", &profile.mobile)?;
    require("email", &profile.email)?;

    let email = profile.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(LedgerError::Validation(format!(
            "email '{email}' is malformed"
        ))),
    }
}

/// Validates a retailer provisioning request.
///
/// An opening amount of zero is accepted; negative amounts are not.
///
/// # Errors
///
/// Returns a validation error for missing fields or a negative amount.
pub fn validate_create_retailer(input: &CreateRetailerInput) -> Result<(), LedgerError> {
    require("distributor username", &input.distributor_username)?;
    validate_profile(&input.profile)?;
    if input.amount < 0 {
        return Err(LedgerError::InvalidAmount(input.amount));
    }
    if input.profile.username == input.distributor_username {
        return Err(LedgerError::Validation(
            "retailer and distributor must differ".to_string(),
        ));
    }
    Ok(())
}

/// Validates a top-up request.
///
/// # Errors
///
/// Returns a validation error for missing fields or a non-positive amount.
pub fn validate_allocate(input: &AllocateInput) -> Result<(), LedgerError> {
    require("distributor username", &input.distributor_username)?;
    require("retailer", &input.retailer)?;
    if input.amount <= 0 {
        return Err(LedgerError::InvalidAmount(input.amount));
    }
    if input.retailer == input.distributor_username {
        return Err(LedgerError::Validation(
            "retailer and distributor must differ".to_string(),
        ));
    }
    Ok(())
}
