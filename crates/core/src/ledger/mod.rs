//! Credit ledger logic.
//!
//! This module implements the spend/allocation rules of the two-tier
//! distributor → retailer hierarchy:
//! - Balance and quota value types
//! - Checked credit arithmetic
//! - Request validation
//! - Error types for ledger operations

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use error::{DuplicateField, LedgerError};
pub use service::LedgerService;
pub use types::{
    AccountKind, AllocateInput, Allocation, CreateRetailerInput, CreditBalance, Quota,
    RetailerProfile,
};
pub use validation::{validate_allocate, validate_create_retailer, validate_profile};
