//! Property-based tests for LedgerService.
//!
//! - Retailer balances never go negative
//! - Distributor `used` never exceeds `total`
//! - Credit is conserved between a distributor and its retailer

use proptest::prelude::*;

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{CreditBalance, Quota};

/// One step applied to a single distributor/retailer pair.
#[derive(Debug, Clone)]
enum Op {
    Debit,
    Refund,
    Allocate(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Debit),
        Just(Op::Refund),
        (0i64..60).prop_map(Op::Allocate),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any sequence of debit/refund/allocate keeps both invariants.
    #[test]
    fn prop_invariants_hold_for_any_sequence(
        granted in 0i64..500,
        opening in 0i64..20,
        ops in prop::collection::vec(op_strategy(), 0..64),
    ) {
        let mut quota = Quota::new(granted, 0);
        let mut retailer = CreditBalance::new(opening);

        for op in ops {
            match op {
                Op::Debit => {
                    if let Ok(next) = LedgerService::debit_one(retailer) {
                        retailer = next;
                    }
                }
                Op::Refund => {
                    retailer = LedgerService::refund_one(retailer).unwrap();
                }
                Op::Allocate(amount) => {
                    if let Ok(allocation) = LedgerService::allocate(quota, retailer, amount) {
                        quota = allocation.quota;
                        retailer = allocation.retailer;
                    }
                }
            }

            prop_assert!(retailer.total >= 0);
            prop_assert!(quota.used >= 0);
            prop_assert!(quota.used <= quota.total);
        }
    }

    /// Debit fails exactly when the balance is empty.
    #[test]
    fn prop_debit_fails_iff_empty(total in -5i64..100) {
        let result = LedgerService::debit_one(CreditBalance::new(total));
        if total <= 0 {
            let is_insufficient = matches!(result, Err(LedgerError::InsufficientBalance { .. }));
            prop_assert!(is_insufficient);
        } else {
            prop_assert_eq!(result.unwrap().total, total - 1);
        }
    }

    /// Debit followed by refund restores the original balance.
    #[test]
    fn prop_refund_undoes_debit(total in 1i64..10_000) {
        let debited = LedgerService::debit_one(CreditBalance::new(total)).unwrap();
        let refunded = LedgerService::refund_one(debited).unwrap();
        prop_assert_eq!(refunded.total, total);
    }

    /// Allocation succeeds iff the available quota covers the amount,
    /// and never creates or destroys credit.
    #[test]
    fn prop_allocation_conserves_credit(
        total in 0i64..1_000,
        used_fraction in 0i64..=100,
        retailer in 0i64..1_000,
        amount in 0i64..1_000,
    ) {
        let used = total * used_fraction / 100;
        let quota = Quota::new(total, used);

        match LedgerService::allocate(quota, CreditBalance::new(retailer), amount) {
            Ok(allocation) => {
                prop_assert!(amount <= quota.available());
                prop_assert_eq!(allocation.quota.used - used, amount);
                prop_assert_eq!(allocation.retailer.total - retailer, amount);
                prop_assert_eq!(allocation.quota.total, total);
            }
            Err(LedgerError::InsufficientBalance { available, requested }) => {
                prop_assert!(amount > quota.available());
                prop_assert_eq!(available, quota.available());
                prop_assert_eq!(requested, amount);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
