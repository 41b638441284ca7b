//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod entries;
pub mod notices;
pub mod otps;
pub mod sea_orm_active_enums;
