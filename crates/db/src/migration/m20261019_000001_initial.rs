//! Initial database migration.
//!
//! Creates the enum types, the account/entry/OTP/notice tables, balance
//! CHECK constraints, natural-key unique constraints, and read-path indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: ENTRY WORKFLOW
        // ============================================================
        db.execute_unprepared(ENTRIES_SQL).await?;
        db.execute_unprepared(OTPS_SQL).await?;

        // ============================================================
        // PART 4: NOTICES
        // ============================================================
        db.execute_unprepared(NOTICES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM (
    'distributor',
    'retailer'
);

CREATE TYPE entry_status AS ENUM (
    'not_started',
    'processing',
    'otp_submitted',
    'otp_sent_by_operator',
    'otp_resent',
    'qr_resend',
    'viewed',
    'success',
    'rejected',
    'hold'
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id                  BIGSERIAL PRIMARY KEY,
    account_type        account_type NOT NULL,
    username            VARCHAR(100) NOT NULL UNIQUE,
    password            VARCHAR(255) NOT NULL,
    name                VARCHAR(255) NOT NULL,
    mobile              VARCHAR(20) NOT NULL UNIQUE,
    email               VARCHAR(255) NOT NULL UNIQUE,
    total_amount        BIGINT NOT NULL DEFAULT 0,
    used_amount         BIGINT NOT NULL DEFAULT 0,
    distributor_id      VARCHAR(100),
    distributor_name    VARCHAR(255),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_total_amount_non_negative CHECK (total_amount >= 0),
    CONSTRAINT chk_used_amount_non_negative CHECK (used_amount >= 0),
    CONSTRAINT chk_distributor_quota CHECK (
        account_type <> 'distributor' OR used_amount <= total_amount
    )
);

CREATE INDEX idx_accounts_distributor ON accounts(distributor_id);
CREATE INDEX idx_accounts_username_lower ON accounts(LOWER(username));
";

const ENTRIES_SQL: &str = r"
CREATE TABLE entries (
    id                  BIGSERIAL PRIMARY KEY,
    submitter           VARCHAR(100) NOT NULL,
    distributor_id      VARCHAR(100) NOT NULL,
    document_number     VARCHAR(50) NOT NULL,
    contact_number      VARCHAR(20) NOT NULL,
    holder_name         VARCHAR(255) NOT NULL,
    region              VARCHAR(100) NOT NULL,
    status              entry_status NOT NULL DEFAULT 'not_started',
    operator            VARCHAR(100),
    image_path          VARCHAR(500),
    viewed              BOOLEAN NOT NULL DEFAULT false,
    remarks             TEXT,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_entries_key UNIQUE (document_number, contact_number)
);

CREATE INDEX idx_entries_submitter ON entries(submitter, id DESC);
CREATE INDEX idx_entries_distributor ON entries(distributor_id, id DESC);
CREATE INDEX idx_entries_status ON entries(status, id DESC);
";

const OTPS_SQL: &str = r"
CREATE TABLE otps (
    id                  BIGSERIAL PRIMARY KEY,
    document_number     VARCHAR(50) NOT NULL,
    contact_number      VARCHAR(20) NOT NULL,
    otp                 VARCHAR(20) NOT NULL,
    distributor_id      VARCHAR(100) NOT NULL,
    submitter           VARCHAR(100) NOT NULL,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_otps_key UNIQUE (document_number, contact_number)
);
";

const NOTICES_SQL: &str = r"
CREATE TABLE notices (
    id                  BIGSERIAL PRIMARY KEY,
    title               VARCHAR(255) NOT NULL,
    message             TEXT NOT NULL,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS notices;
DROP TABLE IF EXISTS otps;
DROP TABLE IF EXISTS entries;
DROP TABLE IF EXISTS accounts;
DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS account_type;
";
