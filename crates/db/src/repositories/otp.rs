//! OTP repository: one record per entry key, last write wins.

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use entryflow_core::workflow::{EntryKey, OtpSubmission, WorkflowError};

use crate::entities::otps;

use super::Clock;

/// OTP repository.
#[derive(Debug, Clone)]
pub struct OtpRepository {
    db: DatabaseConnection,
    clock: Clock,
}

impl OtpRepository {
    /// Creates a new OTP repository.
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

    /// Stores the code for a key without touching the entry status.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for blank fields or `Database` if the write fails.
    pub async fn upsert(&self, submission: &OtpSubmission) -> Result<otps::Model, WorkflowError> {
        submission.validate()?;
        upsert_in(&self.db, submission, self.clock.now())
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))
    }

    /// Latest code stored for a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest_by_key(&self, key: &EntryKey) -> Result<Option<otps::Model>, DbErr> {
        otps::Entity::find()
            .filter(otps::Column::DocumentNumber.eq(key.document_number.as_str()))
            .filter(otps::Column::ContactNumber.eq(key.contact_number.as_str()))
            .order_by_desc(otps::Column::Id)
            .one(&self.db)
            .await
    }
}

/// `INSERT ... ON CONFLICT (document_number, contact_number) DO UPDATE`.
pub(crate) async fn upsert_in<C: ConnectionTrait>(
    conn: &C,
    submission: &OtpSubmission,
    now: DateTimeWithTimeZone,
) -> Result<otps::Model, DbErr> {
    let record = otps::ActiveModel {
        document_number: Set(submission.key.document_number.clone()),
        contact_number: Set(submission.key.contact_number.clone()),
        otp: Set(submission.otp.clone()),
        distributor_id: Set(submission.distributor_id.clone()),
        submitter: Set(submission.submitter.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    otps::Entity::insert(record)
        .on_conflict(
            OnConflict::columns([otps::Column::DocumentNumber, otps::Column::ContactNumber])
                .update_columns([
                    otps::Column::Otp,
                    otps::Column::DistributorId,
                    otps::Column::Submitter,
                    otps::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(conn)
        .await
}
