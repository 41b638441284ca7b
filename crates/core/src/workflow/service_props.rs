//! Property-based tests for the entry transition table.

use proptest::prelude::*;

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{EntryAction, EntryStatus, Outcome};

fn arb_status() -> impl Strategy<Value = EntryStatus> {
    proptest::sample::select(EntryStatus::ALL.to_vec())
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Success),
        Just(Outcome::Rejected),
        Just(Outcome::Hold),
    ]
}

fn arb_action() -> impl Strategy<Value = EntryAction> {
    prop_oneof![
        Just(EntryAction::Claim),
        Just(EntryAction::SubmitOtp),
        any::<bool>().prop_map(|resend| EntryAction::IssueOtp { resend }),
        any::<bool>().prop_map(|resend| EntryAction::AttachImage { resend }),
        Just(EntryAction::MarkViewed),
        arb_outcome().prop_map(EntryAction::Finalize),
        Just(EntryAction::Reset),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Final states refuse a second verdict, a claim, and a code from the
    /// retailer; operator actions and reset reopen them.
    #[test]
    fn prop_final_states_exits(from in arb_status(), action in arb_action()) {
        prop_assume!(from.is_final());
        let result = WorkflowService::apply(from, action);
        match action {
            EntryAction::Finalize(_) | EntryAction::Claim | EntryAction::SubmitOtp => {
                let is_invalid = matches!(result, Err(WorkflowError::InvalidTransition { .. }));
                prop_assert!(is_invalid);
            }
            _ => {
                let transition = result.unwrap();
                prop_assert!(!transition.to.is_final());
                prop_assert!(!transition.refund_submitter);
            }
        }
    }

    /// Reset is accepted from every state and always clears progress.
    #[test]
    fn prop_reset_always_legal(from in arb_status()) {
        let transition = WorkflowService::apply(from, EntryAction::Reset).unwrap();
        prop_assert_eq!(transition.to, EntryStatus::NotStarted);
        prop_assert!(transition.clears_progress);
    }

    /// A refund only ever comes from a rejection of a non-final entry.
    #[test]
    fn prop_refund_only_on_rejection(from in arb_status(), action in arb_action()) {
        if let Ok(transition) = WorkflowService::apply(from, action) {
            prop_assert_eq!(
                transition.refund_submitter,
                transition.to == EntryStatus::Rejected
            );
            if transition.refund_submitter {
                prop_assert!(!from.is_final());
            }
        }
    }

    /// `is_valid` agrees with `apply`.
    #[test]
    fn prop_is_valid_matches_apply(from in arb_status(), action in arb_action()) {
        prop_assert_eq!(
            WorkflowService::is_valid(from, action),
            WorkflowService::apply(from, action).is_ok()
        );
    }

    /// Every refund after the first needs the entry to have left a final
    /// state in between.
    #[test]
    fn prop_one_refund_per_reopening(
        actions in prop::collection::vec(arb_action(), 1..40)
    ) {
        let mut status = WorkflowService::initial();
        let mut refunds = 0u32;
        let mut reopenings = 0u32;
        for action in actions {
            if let Ok(transition) = WorkflowService::apply(status, action) {
                if transition.from.is_final() && !transition.to.is_final() {
                    reopenings += 1;
                }
                if transition.refund_submitter {
                    refunds += 1;
                }
                status = transition.to;
            }
            prop_assert!(refunds <= reopenings + 1);
        }
    }
}
