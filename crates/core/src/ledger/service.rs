//! Credit arithmetic for the distributor → retailer hierarchy.
//!
//! The repository layer reads locked rows, hands the numbers to
//! `LedgerService`, and writes back whatever it returns. Keeping the
//! arithmetic here means the invariants hold no matter which storage
//! path calls it:
//! - a retailer balance never drops below zero
//! - a distributor never allocates more than it was granted

use super::error::LedgerError;
use super::types::{Allocation, CreditBalance, Quota};

/// Stateless service for credit balance changes.
pub struct LedgerService;

impl LedgerService {
    /// Spends one credit unit.
    ///
    /// Returns the balance after the debit.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientBalance` if the balance is zero or below.
    pub fn debit_one(balance: CreditBalance) -> Result<CreditBalance, LedgerError> {
        if balance.total <= 0 {
            return Err(LedgerError::InsufficientBalance {
                available: balance.total.max(0),
                requested: 1,
            });
        }
        Ok(CreditBalance::new(balance.total - 1))
    }

    /// Restores one credit unit after a rejection.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the balance cannot grow any further.
    pub fn refund_one(balance: CreditBalance) -> Result<CreditBalance, LedgerError> {
        balance
            .total
            .checked_add(1)
            .map(CreditBalance::new)
            .ok_or(LedgerError::Overflow)
    }

    /// Moves `amount` from a distributor quota to a retailer balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is negative
    /// - `InsufficientBalance` if the available quota is below `amount`
    /// - `Overflow` if either side would leave the `i64` range
    pub fn allocate(
        quota: Quota,
        retailer: CreditBalance,
        amount: i64,
    ) -> Result<Allocation, LedgerError> {
        if amount < 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let available = quota.available();
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available: available.max(0),
                requested: amount,
            });
        }

        let used = quota.used.checked_add(amount).ok_or(LedgerError::Overflow)?;
        let total = retailer
            .total
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        Ok(Allocation {
            quota: Quota::new(quota.total, used),
            retailer: CreditBalance::new(total),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_one_decrements() {
        let after = LedgerService::debit_one(CreditBalance::new(10)).unwrap();
        assert_eq!(after.total, 9);
    }

    #[test]
    fn test_debit_last_unit() {
        let after = LedgerService::debit_one(CreditBalance::new(1)).unwrap();
        assert_eq!(after.total, 0);
    }

    #[test]
    fn test_debit_empty_balance_fails() {
        let result = LedgerService::debit_one(CreditBalance::new(0));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance {
                available: 0,
                requested: 1
            })
        ));
    }

    #[test]
    fn test_refund_one_increments() {
        let after = LedgerService::refund_one(CreditBalance::new(0)).unwrap();
        assert_eq!(after.total, 1);
    }

    #[test]
    fn test_refund_overflow() {
        let result = LedgerService::refund_one(CreditBalance::new(i64::MAX));
        assert!(matches!(result, Err(LedgerError::Overflow)));
    }

    #[test]
    fn test_allocate_moves_credit() {
        let result =
            LedgerService::allocate(Quota::new(100, 0), CreditBalance::new(0), 10).unwrap();
        assert_eq!(result.quota, Quota::new(100, 10));
        assert_eq!(result.retailer, CreditBalance::new(10));
        assert_eq!(result.amount, 10);
    }

    #[test]
    fn test_allocate_exact_available_then_empty() {
        let first =
            LedgerService::allocate(Quota::new(50, 40), CreditBalance::new(3), 10).unwrap();
        assert_eq!(first.quota.available(), 0);

        let second = LedgerService::allocate(first.quota, first.retailer, 10);
        assert!(matches!(
            second,
            Err(LedgerError::InsufficientBalance {
                available: 0,
                requested: 10
            })
        ));
    }

    #[test]
    fn test_allocate_zero_is_noop() {
        let result =
            LedgerService::allocate(Quota::new(5, 5), CreditBalance::new(2), 0).unwrap();
        assert_eq!(result.quota, Quota::new(5, 5));
        assert_eq!(result.retailer, CreditBalance::new(2));
    }

    #[test]
    fn test_allocate_negative_rejected() {
        let result = LedgerService::allocate(Quota::new(5, 0), CreditBalance::new(0), -1);
        assert!(matches!(result, Err(LedgerError::InvalidAmount(-1))));
    }
}
