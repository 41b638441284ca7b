//! Workflow repository for entry lifecycle transitions.
//!
//! Each method locks the entry row (by key, or by id for claim and reset),
//! asks [`WorkflowService`] whether the action is legal from the stored
//! status, and writes the new status together with its side effects in the
//! same transaction. A rejection refunds the submitter before commit.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};

use entryflow_core::storage::ImageStore;
use entryflow_core::validation::require;
use entryflow_core::workflow::{
    EntryAction, EntryKey, EntryStatus, OtpSubmission, Outcome, SubmitEntryInput, Transition,
    WorkflowError, WorkflowService,
};

use crate::entities::{entries, otps, sea_orm_active_enums::EntryStatus as DbStatus};

use super::ledger::{debit_one_in, refund_one_in};
use super::otp::upsert_in;
use super::{Clock, settle, unique_violation};

/// A committed submission.
#[derive(Debug, Clone)]
pub struct SubmittedEntry {
    /// The new entry, in `NotStarted`.
    pub entry: entries::Model,
    /// Submitter balance after the debit.
    pub remaining: i64,
}

/// A committed OTP submission.
#[derive(Debug, Clone)]
pub struct RecordedOtp {
    /// The stored code.
    pub otp: otps::Model,
    /// The entry, in `OtpSubmitted`.
    pub entry: entries::Model,
}

/// A committed verdict.
#[derive(Debug, Clone)]
pub struct FinalizedEntry {
    /// The entry in its new status.
    pub entry: entries::Model,
    /// Submitter balance after the refund, when the entry was rejected.
    pub refunded_balance: Option<i64>,
}

/// Workflow repository for entry state transitions.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
    images: ImageStore,
    clock: Clock,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, images: ImageStore) -> Self {
        Self {
            db,
            images,
            clock: Clock::default(),
        }
    }

    /// Uses `clock` for `updated_at` stamps.
    #[must_use]
    pub const fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Submits a new entry, spending one credit of the submitter.
    ///
    /// # Errors
    ///
    /// - `Validation` for missing fields
    /// - `Ledger(AccountNotFound)` / `Ledger(InsufficientBalance)` from the debit
    /// - `DuplicateEntry` if the key is already taken
    pub async fn submit_entry(
        &self,
        input: SubmitEntryInput,
    ) -> Result<SubmittedEntry, WorkflowError> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = async {
            let now = self.clock.now();
            let (_, remaining) = debit_one_in(&txn, &input.submitter, now).await?;

            if find_by_key(&txn, &input.key).await?.is_some() {
                return Err(WorkflowError::DuplicateEntry(input.key.to_string()));
            }

            let entry = entries::ActiveModel {
                submitter: Set(input.submitter.clone()),
                distributor_id: Set(input.distributor_id.clone()),
                document_number: Set(input.key.document_number.clone()),
                contact_number: Set(input.key.contact_number.clone()),
                holder_name: Set(input.holder_name.clone()),
                region: Set(input.region.clone()),
                status: Set(core_status_to_db(WorkflowService::initial())),
                operator: Set(None),
                image_path: Set(None),
                viewed: Set(false),
                remarks: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|err| match unique_violation(&err) {
                Some(_) => WorkflowError::DuplicateEntry(input.key.to_string()),
                None => db_err(err),
            })?;

            Ok::<_, WorkflowError>(SubmittedEntry { entry, remaining })
        }
        .await;
        let result = settle(txn, result, db_err).await;

        match &result {
            Ok(done) => info!(
                entry_id = done.entry.id,
                submitter = %input.submitter,
                remaining = done.remaining,
                "Entry submitted"
            ),
            Err(err) => warn!(
                submitter = %input.submitter,
                key = %input.key,
                error = %err,
                "Entry submission rolled back"
            ),
        }
        result
    }

    /// Assigns an operator to an entry and moves it to `Processing`.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if no entry has this id
    /// - `InvalidTransition` unless the entry is `NotStarted` or `Hold`
    pub async fn claim_entry(
        &self,
        entry_id: i64,
        operator: &str,
    ) -> Result<entries::Model, WorkflowError> {
        require("operator", operator)?;
        let action = EntryAction::Claim;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = async {
            let entry = lock_by_id(&txn, entry_id).await?;
            let transition = check(&entry, action)?;

            let mut active: entries::ActiveModel = entry.into();
            active.status = Set(core_status_to_db(transition.to));
            active.operator = Set(Some(operator.to_string()));
            active.updated_at = Set(self.clock.now());
            active.update(&txn).await.map_err(db_err)
        }
        .await;

        finish(txn, result, action, &entry_id.to_string()).await
    }

    /// Records a code supplied by the retailer and moves the entry to
    /// `OtpSubmitted`.
    ///
    /// The entry row is locked before the OTP upsert, so a missing entry
    /// aborts without writing a code.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if no entry has this key
    /// - `InvalidTransition` unless the entry is active
    pub async fn submit_otp(
        &self,
        submission: OtpSubmission,
    ) -> Result<RecordedOtp, WorkflowError> {
        submission.validate()?;
        let action = EntryAction::SubmitOtp;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = async {
            let now = self.clock.now();
            let entry = lock_by_key(&txn, &submission.key).await?;
            let transition = check(&entry, action)?;

            let otp = upsert_in(&txn, &submission, now).await.map_err(db_err)?;

            let mut active: entries::ActiveModel = entry.into();
            active.status = Set(core_status_to_db(transition.to));
            active.updated_at = Set(now);
            let entry = active.update(&txn).await.map_err(db_err)?;

            Ok::<_, WorkflowError>(RecordedOtp { otp, entry })
        }
        .await;
        let result = settle(txn, result, db_err).await;

        match &result {
            Ok(done) => info!(
                entry_id = done.entry.id,
                key = %submission.key,
                action = %action,
                "Entry transition committed"
            ),
            Err(err) => warn!(
                key = %submission.key,
                action = %action,
                error = %err,
                "Entry transition rolled back"
            ),
        }
        result
    }

    /// Marks that the operator sent (or resent) a code to the holder.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if no entry has this key.
    pub async fn issue_otp(
        &self,
        key: &EntryKey,
        resend: bool,
    ) -> Result<entries::Model, WorkflowError> {
        self.set_status(key, EntryAction::IssueOtp { resend }).await
    }

    /// Stores an image for the entry and moves it to `Processing`, or to
    /// `QrResend` when replacing an earlier image.
    ///
    /// The bytes are written to blob storage before the transaction opens;
    /// only the resulting path is written under the row lock.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if no entry has this key
    /// - `NoImageToReplace` for a resend without an earlier image
    /// - `Storage` if the upload fails
    pub async fn attach_image(
        &self,
        key: &EntryKey,
        bytes: Vec<u8>,
        resend: bool,
    ) -> Result<entries::Model, WorkflowError> {
        key.validate()?;
        let action = EntryAction::AttachImage { resend };

        // Fail fast before uploading; the locked check below is authoritative.
        let current = find_by_key(&self.db, key)
            .await?
            .ok_or_else(|| WorkflowError::EntryNotFound(key.to_string()))?;
        check_image_action(&current, key, action)?;

        let path = self
            .images
            .put_entry_image(&key.document_number, bytes)
            .await?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = async {
            let entry = lock_by_key(&txn, key).await?;
            let transition = check_image_action(&entry, key, action)?;

            let mut active: entries::ActiveModel = entry.into();
            active.status = Set(core_status_to_db(transition.to));
            active.image_path = Set(Some(path.clone()));
            active.updated_at = Set(self.clock.now());
            active.update(&txn).await.map_err(db_err)
        }
        .await;

        finish(txn, result, action, &key.to_string()).await
    }

    /// Marks the entry image as viewed by the retailer.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if no entry has this key.
    pub async fn mark_viewed(&self, key: &EntryKey) -> Result<entries::Model, WorkflowError> {
        self.set_status(key, EntryAction::MarkViewed).await
    }

    /// Closes or parks an entry. A rejection refunds one credit to the
    /// submitter in the same transaction. `remarks` replaces the stored
    /// remarks; `None` clears them.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if no entry has this key
    /// - `InvalidTransition` if the entry is already final
    /// - `Ledger(AccountNotFound)` if the submitter account is gone
    pub async fn finalize(
        &self,
        key: &EntryKey,
        outcome: Outcome,
        remarks: Option<String>,
    ) -> Result<FinalizedEntry, WorkflowError> {
        key.validate()?;
        let action = EntryAction::Finalize(outcome);

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = async {
            let now = self.clock.now();
            let entry = lock_by_key(&txn, key).await?;
            let transition = check(&entry, action)?;

            let refunded_balance = if transition.refund_submitter {
                Some(refund_one_in(&txn, &entry.submitter, now).await?)
            } else {
                None
            };

            let mut active: entries::ActiveModel = entry.into();
            active.status = Set(core_status_to_db(transition.to));
            active.remarks = Set(remarks.clone());
            active.updated_at = Set(now);
            let entry = active.update(&txn).await.map_err(db_err)?;

            Ok::<_, WorkflowError>(FinalizedEntry {
                entry,
                refunded_balance,
            })
        }
        .await;
        let result = settle(txn, result, db_err).await;

        match &result {
            Ok(done) => info!(
                entry_id = done.entry.id,
                key = %key,
                action = %action,
                refunded_balance = ?done.refunded_balance,
                "Entry transition committed"
            ),
            Err(err) => warn!(
                key = %key,
                action = %action,
                error = %err,
                "Entry transition rolled back"
            ),
        }
        result
    }

    /// Puts an entry back to `NotStarted`, clearing image, viewed flag,
    /// and operator.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if no entry has this id.
    pub async fn reset_entry(&self, entry_id: i64) -> Result<entries::Model, WorkflowError> {
        let action = EntryAction::Reset;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = async {
            let entry = lock_by_id(&txn, entry_id).await?;
            let transition = check(&entry, action)?;

            let mut active: entries::ActiveModel = entry.into();
            active.status = Set(core_status_to_db(transition.to));
            if transition.clears_progress {
                active.image_path = Set(None);
                active.viewed = Set(false);
                active.operator = Set(None);
            }
            active.updated_at = Set(self.clock.now());
            active.update(&txn).await.map_err(db_err)
        }
        .await;

        finish(txn, result, action, &entry_id.to_string()).await
    }

    /// Reads a stored entry image.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the path is invalid, missing, or unreadable.
    pub async fn read_image(&self, path: &str) -> Result<Vec<u8>, WorkflowError> {
        Ok(self.images.read(path).await?)
    }

    /// Status-only transition by key.
    async fn set_status(
        &self,
        key: &EntryKey,
        action: EntryAction,
    ) -> Result<entries::Model, WorkflowError> {
        key.validate()?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = async {
            let entry = lock_by_key(&txn, key).await?;
            let transition = check(&entry, action)?;

            let mut active: entries::ActiveModel = entry.into();
            active.status = Set(core_status_to_db(transition.to));
            if action == EntryAction::MarkViewed {
                active.viewed = Set(true);
            }
            active.updated_at = Set(self.clock.now());
            active.update(&txn).await.map_err(db_err)
        }
        .await;

        finish(txn, result, action, &key.to_string()).await
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn db_err(err: DbErr) -> WorkflowError {
    WorkflowError::Database(err.to_string())
}

fn check(entry: &entries::Model, action: EntryAction) -> Result<Transition, WorkflowError> {
    WorkflowService::apply(db_status_to_core(entry.status), action)
}

fn check_image_action(
    entry: &entries::Model,
    key: &EntryKey,
    action: EntryAction,
) -> Result<Transition, WorkflowError> {
    let transition = check(entry, action)?;
    if action == (EntryAction::AttachImage { resend: true }) {
        WorkflowService::ensure_replaceable(key, entry.image_path.is_some())?;
    }
    Ok(transition)
}

/// Commits a single-entry transition and logs the outcome.
async fn finish(
    txn: DatabaseTransaction,
    result: Result<entries::Model, WorkflowError>,
    action: EntryAction,
    subject: &str,
) -> Result<entries::Model, WorkflowError> {
    let result = settle(txn, result, db_err).await;
    match &result {
        Ok(entry) => info!(
            entry_id = entry.id,
            subject,
            action = %action,
            status = %db_status_to_core(entry.status),
            "Entry transition committed"
        ),
        Err(err) => warn!(
            subject,
            action = %action,
            error = %err,
            "Entry transition rolled back"
        ),
    }
    result
}

async fn find_by_key<C: ConnectionTrait>(
    conn: &C,
    key: &EntryKey,
) -> Result<Option<entries::Model>, WorkflowError> {
    entries::Entity::find()
        .filter(entries::Column::DocumentNumber.eq(key.document_number.as_str()))
        .filter(entries::Column::ContactNumber.eq(key.contact_number.as_str()))
        .one(conn)
        .await
        .map_err(db_err)
}

async fn lock_by_key(
    txn: &DatabaseTransaction,
    key: &EntryKey,
) -> Result<entries::Model, WorkflowError> {
    entries::Entity::find()
        .filter(entries::Column::DocumentNumber.eq(key.document_number.as_str()))
        .filter(entries::Column::ContactNumber.eq(key.contact_number.as_str()))
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| WorkflowError::EntryNotFound(key.to_string()))
}

async fn lock_by_id(txn: &DatabaseTransaction, id: i64) -> Result<entries::Model, WorkflowError> {
    entries::Entity::find_by_id(id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| WorkflowError::EntryNotFound(id.to_string()))
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts database EntryStatus to core EntryStatus.
pub(crate) fn db_status_to_core(status: DbStatus) -> EntryStatus {
    match status {
        DbStatus::NotStarted => EntryStatus::NotStarted,
        DbStatus::Processing => EntryStatus::Processing,
        DbStatus::OtpSubmitted => EntryStatus::OtpSubmitted,
        DbStatus::OtpSentByOperator => EntryStatus::OtpSentByOperator,
        DbStatus::OtpResent => EntryStatus::OtpResent,
        DbStatus::QrResend => EntryStatus::QrResend,
        DbStatus::Viewed => EntryStatus::Viewed,
        DbStatus::Success => EntryStatus::Success,
        DbStatus::Rejected => EntryStatus::Rejected,
        DbStatus::Hold => EntryStatus::Hold,
    }
}

/// Converts core EntryStatus to database EntryStatus.
pub(crate) fn core_status_to_db(status: EntryStatus) -> DbStatus {
    match status {
        EntryStatus::NotStarted => DbStatus::NotStarted,
        EntryStatus::Processing => DbStatus::Processing,
        EntryStatus::OtpSubmitted => DbStatus::OtpSubmitted,
        EntryStatus::OtpSentByOperator => DbStatus::OtpSentByOperator,
        EntryStatus::OtpResent => DbStatus::OtpResent,
        EntryStatus::QrResend => DbStatus::QrResend,
        EntryStatus::Viewed => DbStatus::Viewed,
        EntryStatus::Success => DbStatus::Success,
        EntryStatus::Rejected => DbStatus::Rejected,
        EntryStatus::Hold => DbStatus::Hold,
    }
}
