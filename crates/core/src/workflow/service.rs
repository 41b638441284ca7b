//! Workflow service for entry status transitions.
//!
//! This module implements the state machine that moves an entry from
//! submission to a final verdict. It is pure: the repository loads the
//! current status, asks [`WorkflowService::apply`] for the next one, and
//! writes it back together with any ledger side effect.

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{EntryAction, EntryKey, EntryStatus, Outcome, Transition};

/// Stateless service for entry workflow transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Status of a freshly submitted entry.
    #[must_use]
    pub const fn initial() -> EntryStatus {
        EntryStatus::NotStarted
    }

    /// Evaluate `action` against the current status.
    ///
    /// # Returns
    /// * `Ok(Transition)` with the next status and its side effects
    /// * `Err(WorkflowError::InvalidTransition)` if the table has no
    ///   entry for `(current, action)`
    pub fn apply(current: EntryStatus, action: EntryAction) -> Result<Transition, WorkflowError> {
        let to = Self::next_status(current, action).ok_or(WorkflowError::InvalidTransition {
            from: current,
            action: action.name(),
        })?;

        Ok(Transition {
            from: current,
            to,
            refund_submitter: matches!(action, EntryAction::Finalize(Outcome::Rejected)),
            clears_progress: matches!(action, EntryAction::Reset),
        })
    }

    /// Check that a replacement image has something to replace.
    pub fn ensure_replaceable(key: &EntryKey, has_image: bool) -> Result<(), WorkflowError> {
        if has_image {
            Ok(())
        } else {
            Err(WorkflowError::NoImageToReplace(key.to_string()))
        }
    }

    /// Returns true if `action` is legal from `current`.
    #[must_use]
    pub fn is_valid(current: EntryStatus, action: EntryAction) -> bool {
        Self::next_status(current, action).is_some()
    }

    fn next_status(current: EntryStatus, action: EntryAction) -> Option<EntryStatus> {
        match action {
            EntryAction::Claim => {
                matches!(current, EntryStatus::NotStarted | EntryStatus::Hold)
                    .then_some(EntryStatus::Processing)
            }
            EntryAction::SubmitOtp => current.is_active().then_some(EntryStatus::OtpSubmitted),
            EntryAction::IssueOtp { resend: false } => Some(EntryStatus::OtpSentByOperator),
            EntryAction::IssueOtp { resend: true } => Some(EntryStatus::OtpResent),
            EntryAction::AttachImage { resend: false } => Some(EntryStatus::Processing),
            EntryAction::AttachImage { resend: true } => Some(EntryStatus::QrResend),
            EntryAction::MarkViewed => Some(EntryStatus::Viewed),
            // A final entry is never finalized again, so a rejection refunds once.
            EntryAction::Finalize(outcome) => {
                (!current.is_final()).then_some(outcome.status())
            }
            EntryAction::Reset => Some(EntryStatus::NotStarted),
        }
    }
}
