//! Ledger repository: the only writer of account balance columns.
//!
//! Every operation runs in one transaction. Rows are locked in a fixed
//! order (retailer or submitter first, then distributor) before any of them
//! is written, and the new column values always come from
//! [`LedgerService`](entryflow_core::ledger::LedgerService).

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, Set, TransactionTrait,
};
use tracing::{info, warn};

use entryflow_core::ledger::{
    AllocateInput, CreateRetailerInput, CreditBalance, DuplicateField, LedgerError,
    LedgerService, Quota, validate_allocate, validate_create_retailer,
};

use crate::entities::{accounts, sea_orm_active_enums::AccountType};

use super::account::{find_colliding, lock_by_username, lock_distributor, lock_retailer};
use super::{Clock, settle, unique_violation};

/// Accounts after a committed allocation.
#[derive(Debug, Clone)]
pub struct AllocationResult {
    /// Retailer row after the top-up.
    pub retailer: accounts::Model,
    /// Distributor row after the quota was consumed.
    pub distributor: accounts::Model,
    /// Credit moved.
    pub amount: i64,
}

/// Ledger repository for credit spend, refund, and allocation.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
    clock: Clock,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            clock: Clock::default(),
        }
    }

    /// Uses `clock` for `updated_at` stamps.
    #[must_use]
    pub const fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Spends one credit of `username` and returns the balance before the debit.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account has this username
    /// - `InsufficientBalance` if the balance is zero
    pub async fn debit_one(&self, username: &str) -> Result<i64, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let result = debit_one_in(&txn, username, self.clock.now()).await;
        let result = settle(txn, result, db_err).await;

        match &result {
            Ok((before, after)) => info!(username, before, after, "Debited one credit"),
            Err(err) => warn!(username, error = %err, "Debit rolled back"),
        }
        result.map(|(before, _)| before)
    }

    /// Returns one credit to `username` and yields the new balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no account has this username.
    pub async fn refund_one(&self, username: &str) -> Result<i64, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let result = refund_one_in(&txn, username, self.clock.now()).await;
        let result = settle(txn, result, db_err).await;

        match &result {
            Ok(after) => info!(username, after, "Refunded one credit"),
            Err(err) => warn!(username, error = %err, "Refund rolled back"),
        }
        result
    }

    /// Moves `amount` credit from a distributor's quota to a retailer.
    ///
    /// The retailer is matched by username or mobile number.
    ///
    /// # Errors
    ///
    /// - `Validation` / `InvalidAmount` for bad input
    /// - `RetailerNotFound` / `DistributorNotFound` if either row is absent
    /// - `InsufficientBalance` if the available quota is below `amount`
    pub async fn allocate(&self, input: AllocateInput) -> Result<AllocationResult, LedgerError> {
        validate_allocate(&input)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = self.allocate_in(&txn, &input).await;
        let result = settle(txn, result, db_err).await;

        match &result {
            Ok(done) => info!(
                distributor = %done.distributor.username,
                retailer = %done.retailer.username,
                amount = done.amount,
                "Allocated credit"
            ),
            Err(err) => warn!(
                distributor = %input.distributor_username,
                retailer = %input.retailer,
                amount = input.amount,
                error = %err,
                "Allocation rolled back"
            ),
        }
        result
    }

    async fn allocate_in(
        &self,
        txn: &DatabaseTransaction,
        input: &AllocateInput,
    ) -> Result<AllocationResult, LedgerError> {
        let retailer = lock_retailer(txn, &input.retailer)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::RetailerNotFound(input.retailer.clone()))?;

        let distributor = lock_distributor(txn, &input.distributor_username)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::DistributorNotFound(input.distributor_username.clone()))?;

        let allocation = LedgerService::allocate(
            Quota::new(distributor.total_amount, distributor.used_amount),
            CreditBalance::new(retailer.total_amount),
            input.amount,
        )?;

        let now = self.clock.now();

        let mut active: accounts::ActiveModel = retailer.into();
        active.total_amount = Set(allocation.retailer.total);
        active.updated_at = Set(now);
        let retailer = active.update(txn).await.map_err(db_err)?;

        let mut active: accounts::ActiveModel = distributor.into();
        active.used_amount = Set(allocation.quota.used);
        active.updated_at = Set(now);
        let distributor = active.update(txn).await.map_err(db_err)?;

        Ok(AllocationResult {
            retailer,
            distributor,
            amount: allocation.amount,
        })
    }

    /// Provisions a retailer funded from a distributor's quota.
    ///
    /// The distributor row stays locked from the uniqueness check through
    /// the insert; a unique violation raised by a concurrent insert is
    /// reported as `DuplicateAccount` as well.
    ///
    /// # Errors
    ///
    /// - `Validation` / `InvalidAmount` for bad input
    /// - `DistributorNotFound` if the distributor is absent
    /// - `DuplicateAccount` if the username, mobile, or email is taken
    /// - `InsufficientBalance` if the available quota is below `amount`
    pub async fn create_retailer(
        &self,
        input: CreateRetailerInput,
    ) -> Result<accounts::Model, LedgerError> {
        validate_create_retailer(&input)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = self.create_retailer_in(&txn, &input).await;
        let result = settle(txn, result, db_err).await;

        match &result {
            Ok(retailer) => info!(
                distributor = %input.distributor_username,
                retailer = %retailer.username,
                amount = input.amount,
                "Provisioned retailer"
            ),
            Err(err) => warn!(
                distributor = %input.distributor_username,
                retailer = %input.profile.username,
                error = %err,
                "Retailer provisioning rolled back"
            ),
        }
        result
    }

    async fn create_retailer_in(
        &self,
        txn: &DatabaseTransaction,
        input: &CreateRetailerInput,
    ) -> Result<accounts::Model, LedgerError> {
        let profile = &input.profile;

        let distributor = lock_distributor(txn, &input.distributor_username)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::DistributorNotFound(input.distributor_username.clone()))?;

        if let Some(existing) =
            find_colliding(txn, &profile.username, &profile.mobile, &profile.email)
                .await
                .map_err(db_err)?
        {
            let field = if existing.username == profile.username {
                DuplicateField::Username
            } else if existing.mobile == profile.mobile {
                DuplicateField::Mobile
            } else {
                DuplicateField::Email
            };
            return Err(LedgerError::DuplicateAccount { field });
        }

        let allocation = LedgerService::allocate(
            Quota::new(distributor.total_amount, distributor.used_amount),
            CreditBalance::new(0),
            input.amount,
        )?;

        let now = self.clock.now();
        let distributor_name = input
            .distributor_name
            .clone()
            .unwrap_or_else(|| distributor.name.clone());
        let distributor_username = distributor.username.clone();

        let mut active: accounts::ActiveModel = distributor.into();
        active.used_amount = Set(allocation.quota.used);
        active.updated_at = Set(now);
        active.update(txn).await.map_err(db_err)?;

        accounts::ActiveModel {
            account_type: Set(AccountType::Retailer),
            username: Set(profile.username.clone()),
            password: Set(profile.password.clone()),
            name: Set(profile.name.clone()),
            mobile: Set(profile.mobile.clone()),
            email: Set(profile.email.clone()),
            total_amount: Set(allocation.retailer.total),
            used_amount: Set(0),
            distributor_id: Set(Some(distributor_username)),
            distributor_name: Set(Some(distributor_name)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|err| match unique_violation(&err) {
            Some(message) => LedgerError::DuplicateAccount {
                field: duplicate_field_from_constraint(&message),
            },
            None => db_err(err),
        })
    }
}

// ============================================================================
// Transaction-scoped helpers (shared with the workflow repository)
// ============================================================================

/// Locks `username` and spends one credit.
///
/// Returns `(before, after)` balances.
pub(crate) async fn debit_one_in(
    txn: &DatabaseTransaction,
    username: &str,
    now: DateTimeWithTimeZone,
) -> Result<(i64, i64), LedgerError> {
    let account = lock_by_username(txn, username)
        .await
        .map_err(db_err)?
        .ok_or_else(|| LedgerError::AccountNotFound(username.to_string()))?;

    let before = CreditBalance::new(account.total_amount);
    let after = LedgerService::debit_one(before)?;

    let mut active: accounts::ActiveModel = account.into();
    active.total_amount = Set(after.total);
    active.updated_at = Set(now);
    active.update(txn).await.map_err(db_err)?;

    Ok((before.total, after.total))
}

/// Locks `username` and returns one credit. Returns the new balance.
pub(crate) async fn refund_one_in(
    txn: &DatabaseTransaction,
    username: &str,
    now: DateTimeWithTimeZone,
) -> Result<i64, LedgerError> {
    let account = lock_by_username(txn, username)
        .await
        .map_err(db_err)?
        .ok_or_else(|| LedgerError::AccountNotFound(username.to_string()))?;

    let after = LedgerService::refund_one(CreditBalance::new(account.total_amount))?;

    let mut active: accounts::ActiveModel = account.into();
    active.total_amount = Set(after.total);
    active.updated_at = Set(now);
    active.update(txn).await.map_err(db_err)?;

    Ok(after.total)
}

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}

/// Maps a Postgres unique-violation message to the colliding column.
fn duplicate_field_from_constraint(message: &str) -> DuplicateField {
    if message.contains("mobile") {
        DuplicateField::Mobile
    } else if message.contains("email") {
        DuplicateField::Email
    } else {
        DuplicateField::Username
    }
}
