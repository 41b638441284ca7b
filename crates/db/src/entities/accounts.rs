//! `SeaORM` Entity for accounts table.

use sea_orm::entity::prelude::*;
use entryflow_core::ledger::{AccountKind, Quota};
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_type: AccountType,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    #[sea_orm(unique)]
    pub mobile: String,
    #[sea_orm(unique)]
    pub email: String,
    pub total_amount: i64,
    pub used_amount: i64,
    pub distributor_id: Option<String>,
    pub distributor_name: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Role of the account in the allocation hierarchy.
    #[must_use]
    pub fn kind(&self) -> AccountKind {
        match self.account_type {
            AccountType::Distributor => AccountKind::Distributor,
            AccountType::Retailer => AccountKind::Retailer,
        }
    }

    /// Quota still available for allocation. Only meaningful for distributors.
    #[must_use]
    pub fn available(&self) -> i64 {
        Quota::new(self.total_amount, self.used_amount).available()
    }
}
