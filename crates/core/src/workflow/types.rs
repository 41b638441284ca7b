//! Workflow domain types for the entry lifecycle.
//!
//! This module defines the closed set of entry statuses, the actions
//! that move an entry between them, and the inputs callers submit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::require;

use super::error::WorkflowError;

/// Entry status in the processing workflow.
///
/// The legal moves between these states live in
/// [`WorkflowService::apply`](super::WorkflowService::apply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Submitted, waiting for an operator.
    NotStarted,
    /// Claimed by an operator, or a fresh image was attached.
    Processing,
    /// Retailer supplied the one-time code.
    OtpSubmitted,
    /// Operator sent a code to the document holder.
    OtpSentByOperator,
    /// Operator sent the code again.
    OtpResent,
    /// A replacement image was attached.
    QrResend,
    /// Retailer viewed the attached image.
    Viewed,
    /// Finished successfully.
    Success,
    /// Rejected; the submitter got the credit back.
    Rejected,
    /// Parked by an operator.
    Hold,
}

impl EntryStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 10] = [
        Self::NotStarted,
        Self::Processing,
        Self::OtpSubmitted,
        Self::OtpSentByOperator,
        Self::OtpResent,
        Self::QrResend,
        Self::Viewed,
        Self::Success,
        Self::Rejected,
        Self::Hold,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Processing => "processing",
            Self::OtpSubmitted => "otp_submitted",
            Self::OtpSentByOperator => "otp_sent_by_operator",
            Self::OtpResent => "otp_resent",
            Self::QrResend => "qr_resend",
            Self::Viewed => "viewed",
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::Hold => "hold",
        }
    }

    /// Returns true for statuses only a reset can leave.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Success | Self::Rejected)
    }

    /// Returns true once an operator has picked the entry up and it is
    /// still moving through the OTP/image exchange.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Processing
                | Self::OtpSubmitted
                | Self::OtpSentByOperator
                | Self::OtpResent
                | Self::QrResend
                | Self::Viewed
        )
    }

    /// Returns true if operators should see the entry in their queue.
    #[must_use]
    pub fn is_queued(&self) -> bool {
        matches!(self, Self::NotStarted | Self::Processing | Self::Hold)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator verdict that closes (or parks) an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Document processed.
    Success,
    /// Document refused; one credit goes back to the submitter.
    Rejected,
    /// Parked for later.
    Hold,
}

impl Outcome {
    /// Status written for this outcome.
    #[must_use]
    pub fn status(self) -> EntryStatus {
        match self {
            Self::Success => EntryStatus::Success,
            Self::Rejected => EntryStatus::Rejected,
            Self::Hold => EntryStatus::Hold,
        }
    }
}

/// A requested move through the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    /// Operator claims the entry.
    Claim,
    /// Retailer supplies the one-time code.
    SubmitOtp,
    /// Operator issues (or reissues) a code.
    IssueOtp {
        /// True when the code is sent again.
        resend: bool,
    },
    /// An image was uploaded for the entry.
    AttachImage {
        /// True when replacing an earlier image.
        resend: bool,
    },
    /// Retailer viewed the image.
    MarkViewed,
    /// Operator closes the entry.
    Finalize(Outcome),
    /// Operator or system puts the entry back at the start.
    Reset,
}

impl EntryAction {
    /// Short name used in errors and logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::SubmitOtp => "submit_otp",
            Self::IssueOtp { resend: false } => "issue_otp",
            Self::IssueOtp { resend: true } => "resend_otp",
            Self::AttachImage { resend: false } => "attach_image",
            Self::AttachImage { resend: true } => "replace_image",
            Self::MarkViewed => "mark_viewed",
            Self::Finalize(_) => "finalize",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for EntryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a legal transition, including the ledger side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status before the action.
    pub from: EntryStatus,
    /// Status after the action.
    pub to: EntryStatus,
    /// Whether the submitter gets one credit back in the same transaction.
    pub refund_submitter: bool,
    /// Whether image path, viewed flag and operator are cleared.
    pub clears_progress: bool,
}

/// Natural key of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    /// Identity document number.
    pub document_number: String,
    /// Contact phone number of the holder.
    pub contact_number: String,
}

impl EntryKey {
    /// Creates a key.
    pub fn new(document_number: impl Into<String>, contact_number: impl Into<String>) -> Self {
        Self {
            document_number: document_number.into(),
            contact_number: contact_number.into(),
        }
    }

    /// Validates that both parts are present.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if either part is blank.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        require("document number", &self.document_number)?;
        require("contact number", &self.contact_number)?;
        Ok(())
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.document_number, self.contact_number)
    }
}

/// Input for submitting a new entry.
#[derive(Debug, Clone)]
pub struct SubmitEntryInput {
    /// Retailer paying for the entry.
    pub submitter: String,
    /// Entry key.
    pub key: EntryKey,
    /// Name printed on the document.
    pub holder_name: String,
    /// Region (state) of the holder.
    pub region: String,
    /// Distributor reference recorded on the entry.
    pub distributor_id: String,
}

impl SubmitEntryInput {
    /// Validates required fields.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` naming the first missing field.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        require("submitter", &self.submitter)?;
        self.key.validate()?;
        require("holder name", &self.holder_name)?;
        require("region", &self.region)?;
        require("distributor id", &self.distributor_id)?;
        Ok(())
    }
}

/// Input for recording a one-time code supplied by the retailer.
#[derive(Debug, Clone)]
pub struct OtpSubmission {
    /// Entry key.
    pub key: EntryKey,
    /// The code.
    pub otp: String,
    /// Distributor reference stored with the code.
    pub distributor_id: String,
    /// Retailer who supplied the code.
    pub submitter: String,
}

impl OtpSubmission {
    /// Validates required fields.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` naming the first missing field.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        self.key.validate()?;
        require("otp", &self.otp)?;
        require("distributor id", &self.distributor_id)?;
        require("submitter", &self.submitter)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", EntryStatus::NotStarted), "not_started");
        assert_eq!(format!("{}", EntryStatus::QrResend), "qr_resend");
    }

    #[test]
    fn test_status_groups() {
        assert!(EntryStatus::Success.is_final());
        assert!(EntryStatus::Rejected.is_final());
        assert!(!EntryStatus::Hold.is_final());

        assert!(EntryStatus::Viewed.is_active());
        assert!(!EntryStatus::NotStarted.is_active());
        assert!(!EntryStatus::Hold.is_active());

        assert!(EntryStatus::Hold.is_queued());
        assert!(!EntryStatus::Viewed.is_queued());
    }

    #[test]
    fn test_outcome_status() {
        assert_eq!(Outcome::Success.status(), EntryStatus::Success);
        assert_eq!(Outcome::Rejected.status(), EntryStatus::Rejected);
        assert_eq!(Outcome::Hold.status(), EntryStatus::Hold);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(EntryAction::IssueOtp { resend: true }.name(), "resend_otp");
        assert_eq!(
            EntryAction::AttachImage { resend: false }.to_string(),
            "attach_image"
        );
    }

    #[test]
    fn test_key_validation() {
        assert!(EntryKey::new("A1", "9999").validate().is_ok());
        assert!(matches!(
            EntryKey::new("", "9999").validate(),
            Err(WorkflowError::Validation(msg)) if msg.contains("document")
        ));
        assert!(matches!(
            EntryKey::new("A1", " ").validate(),
            Err(WorkflowError::Validation(msg)) if msg.contains("contact")
        ));
        assert_eq!(EntryKey::new("A1", "9999").to_string(), "A1/9999");
    }

    #[test]
    fn test_submit_input_validation() {
        let input = SubmitEntryInput {
            submitter: "retail01".to_string(),
            key: EntryKey::new("A1", "9999"),
            holder_name: "Asha".to_string(),
            region: "KA".to_string(),
            distributor_id: "dist01".to_string(),
        };
        assert!(input.validate().is_ok());

        let mut missing_region = input.clone();
        missing_region.region = String::new();
        assert!(matches!(
            missing_region.validate(),
            Err(WorkflowError::Validation(msg)) if msg.contains("region")
        ));
    }

    #[test]
    fn test_otp_submission_validation() {
        let submission = OtpSubmission {
            key: EntryKey::new("A1", "9999"),
            otp: "123456".to_string(),
            distributor_id: "dist01".to_string(),
            submitter: "retail01".to_string(),
        };
        assert!(submission.validate().is_ok());

        let mut blank = submission;
        blank.otp = "  ".to_string();
        assert!(matches!(
            blank.validate(),
            Err(WorkflowError::Validation(msg)) if msg.contains("otp")
        ));
    }
}
