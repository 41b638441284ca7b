//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "distributor")]
    Distributor,
    #[sea_orm(string_value = "retailer")]
    Retailer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
pub enum EntryStatus {
    #[sea_orm(string_value = "not_started")]
    NotStarted,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "otp_submitted")]
    OtpSubmitted,
    #[sea_orm(string_value = "otp_sent_by_operator")]
    OtpSentByOperator,
    #[sea_orm(string_value = "otp_resent")]
    OtpResent,
    #[sea_orm(string_value = "qr_resend")]
    QrResend,
    #[sea_orm(string_value = "viewed")]
    Viewed,
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "hold")]
    Hold,
}
