//! Core business logic for Entryflow.
//!
//! This crate contains pure domain logic with ZERO web or database dependencies.
//! Credit arithmetic, the entry state machine, and input validation live here;
//! `entryflow-db` applies them inside database transactions.
//!
//! # Modules
//!
//! - `ledger` - Credit balances, quotas, and allocation
//! - `workflow` - Entry status state machine
//! - `storage` - Entry image blob storage
//! - `validation` - Shared input checks

pub mod ledger;
pub mod storage;
pub mod validation;
pub mod workflow;
