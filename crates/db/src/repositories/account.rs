//! Account repository: read paths and row locks for the account store.
//!
//! Balance columns are written only by [`LedgerRepository`](super::LedgerRepository);
//! this module offers the locked reads it builds on plus the non-locking
//! queries used by the dashboards and login.

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{accounts, sea_orm_active_enums::AccountType};

use super::Clock;

/// Input for provisioning a top-level distributor.
#[derive(Debug, Clone)]
pub struct NewDistributor {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Email address.
    pub email: String,
    /// Quota granted.
    pub total_amount: i64,
}

/// Account repository for lookups and distributor provisioning.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
    clock: Clock,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            clock: Clock::default(),
        }
    }

    /// Uses `clock` for timestamps.
    #[must_use]
    pub const fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Finds an account by exact username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Lists the retailers provisioned by a distributor, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_distributor(
        &self,
        distributor_username: &str,
    ) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::DistributorId.eq(distributor_username))
            .order_by_desc(accounts::Column::Id)
            .all(&self.db)
            .await
    }

    /// Looks up an account for login.
    ///
    /// The username matches case-insensitively; the password must be equal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_for_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(accounts::Column::Username)))
                    .eq(username.to_lowercase()),
            )
            .filter(accounts::Column::Password.eq(password))
            .one(&self.db)
            .await
    }

    /// Inserts a top-level distributor with an initial quota.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including unique violations.
    pub async fn create_distributor(
        &self,
        input: NewDistributor,
    ) -> Result<accounts::Model, DbErr> {
        let now = self.clock.now();
        accounts::ActiveModel {
            account_type: Set(AccountType::Distributor),
            username: Set(input.username),
            password: Set(input.password),
            name: Set(input.name),
            mobile: Set(input.mobile),
            email: Set(input.email),
            total_amount: Set(input.total_amount),
            used_amount: Set(0),
            distributor_id: Set(None),
            distributor_name: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }
}

// ============================================================================
// Locked reads (used inside ledger and workflow transactions)
// ============================================================================

/// Locks any account by username.
pub(crate) async fn lock_by_username(
    txn: &DatabaseTransaction,
    username: &str,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find()
        .filter(accounts::Column::Username.eq(username))
        .lock_exclusive()
        .one(txn)
        .await
}

/// Locks a distributor by username.
pub(crate) async fn lock_distributor(
    txn: &DatabaseTransaction,
    username: &str,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find()
        .filter(accounts::Column::Username.eq(username))
        .filter(accounts::Column::AccountType.eq(AccountType::Distributor))
        .lock_exclusive()
        .one(txn)
        .await
}

/// Locks a retailer by username or mobile number.
pub(crate) async fn lock_retailer(
    txn: &DatabaseTransaction,
    username_or_mobile: &str,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find()
        .filter(
            Condition::any()
                .add(accounts::Column::Username.eq(username_or_mobile))
                .add(accounts::Column::Mobile.eq(username_or_mobile)),
        )
        .filter(accounts::Column::AccountType.eq(AccountType::Retailer))
        .order_by_asc(accounts::Column::Id)
        .lock_exclusive()
        .one(txn)
        .await
}

/// Finds any account colliding with the given username, mobile, or email.
pub(crate) async fn find_colliding(
    txn: &DatabaseTransaction,
    username: &str,
    mobile: &str,
    email: &str,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find()
        .filter(
            Condition::any()
                .add(accounts::Column::Username.eq(username))
                .add(accounts::Column::Mobile.eq(mobile))
                .add(accounts::Column::Email.eq(email)),
        )
        .one(txn)
        .await
}
