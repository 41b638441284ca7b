//! Drops the length limits on free-form columns.
//!
//! Document numbers, contact numbers, codes and profile fields arrive as
//! whatever the caller typed; input validation only rejects blanks, so the
//! columns accept any length.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(WIDEN_SQL)
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Fails if a stored value no longer fits.
        manager
            .get_connection()
            .execute_unprepared(NARROW_SQL)
            .await?;
        Ok(())
    }
}

const WIDEN_SQL: &str = r"
ALTER TABLE accounts
    ALTER COLUMN username TYPE TEXT,
    ALTER COLUMN password TYPE TEXT,
    ALTER COLUMN name TYPE TEXT,
    ALTER COLUMN mobile TYPE TEXT,
    ALTER COLUMN email TYPE TEXT,
    ALTER COLUMN distributor_id TYPE TEXT,
    ALTER COLUMN distributor_name TYPE TEXT;

ALTER TABLE entries
    ALTER COLUMN submitter TYPE TEXT,
    ALTER COLUMN distributor_id TYPE TEXT,
    ALTER COLUMN document_number TYPE TEXT,
    ALTER COLUMN contact_number TYPE TEXT,
    ALTER COLUMN holder_name TYPE TEXT,
    ALTER COLUMN region TYPE TEXT,
    ALTER COLUMN operator TYPE TEXT,
    ALTER COLUMN image_path TYPE TEXT;

ALTER TABLE otps
    ALTER COLUMN document_number TYPE TEXT,
    ALTER COLUMN contact_number TYPE TEXT,
    ALTER COLUMN otp TYPE TEXT,
    ALTER COLUMN distributor_id TYPE TEXT,
    ALTER COLUMN submitter TYPE TEXT;

ALTER TABLE notices
    ALTER COLUMN title TYPE TEXT;
";

const NARROW_SQL: &str = r"
ALTER TABLE notices
    ALTER COLUMN title TYPE VARCHAR(255);

ALTER TABLE otps
    ALTER COLUMN document_number TYPE VARCHAR(50),
    ALTER COLUMN contact_number TYPE VARCHAR(20),
    ALTER COLUMN otp TYPE VARCHAR(20),
    ALTER COLUMN distributor_id TYPE VARCHAR(100),
    ALTER COLUMN submitter TYPE VARCHAR(100);

ALTER TABLE entries
    ALTER COLUMN submitter TYPE VARCHAR(100),
    ALTER COLUMN distributor_id TYPE VARCHAR(100),
    ALTER COLUMN document_number TYPE VARCHAR(50),
    ALTER COLUMN contact_number TYPE VARCHAR(20),
    ALTER COLUMN holder_name TYPE VARCHAR(255),
    ALTER COLUMN region TYPE VARCHAR(100),
    ALTER COLUMN operator TYPE VARCHAR(100),
    ALTER COLUMN image_path TYPE VARCHAR(500);

ALTER TABLE accounts
    ALTER COLUMN username TYPE VARCHAR(100),
    ALTER COLUMN password TYPE VARCHAR(255),
    ALTER COLUMN name TYPE VARCHAR(255),
    ALTER COLUMN mobile TYPE VARCHAR(20),
    ALTER COLUMN email TYPE VARCHAR(255),
    ALTER COLUMN distributor_id TYPE VARCHAR(100),
    ALTER COLUMN distributor_name TYPE VARCHAR(255);
";
