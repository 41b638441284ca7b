//! Required-field checks shared by the ledger and workflow inputs.

use thiserror::Error;

/// A required input field was empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} is required")]
pub struct MissingField(pub String);

/// Rejects empty or whitespace-only required fields.
///
/// # Errors
///
/// Returns `MissingField` naming `field` when `value` is blank.
pub fn require(field: &str, value: &str) -> Result<(), MissingField> {
    if value.trim().is_empty() {
        return Err(MissingField(field.to_string()));
    }
    Ok(())
}
