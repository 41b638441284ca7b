//! Entry workflow management.
//!
//! This module implements the entry lifecycle state machine.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (EntryStatus, EntryAction, inputs)
//! - `error` - Workflow-specific error types
//! - `service` - State transition table

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::WorkflowService;
pub use types::{
    EntryAction, EntryKey, EntryStatus, OtpSubmission, Outcome, SubmitEntryInput, Transition,
};
