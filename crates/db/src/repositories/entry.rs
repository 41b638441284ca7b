//! Entry repository: non-locking read paths, newest first.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use entryflow_core::workflow::{EntryKey, EntryStatus as CoreStatus};

use crate::entities::{entries, sea_orm_active_enums::EntryStatus};

use super::workflow::core_status_to_db;

/// Entry repository for queries.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an entry by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<entries::Model>, DbErr> {
        entries::Entity::find_by_id(id).one(&self.db).await
    }

    /// Entries submitted by a retailer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_submitter(&self, submitter: &str) -> Result<Vec<entries::Model>, DbErr> {
        entries::Entity::find()
            .filter(entries::Column::Submitter.eq(submitter))
            .order_by_desc(entries::Column::Id)
            .all(&self.db)
            .await
    }

    /// Entries recorded against a distributor.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_distributor(
        &self,
        distributor_id: &str,
    ) -> Result<Vec<entries::Model>, DbErr> {
        entries::Entity::find()
            .filter(entries::Column::DistributorId.eq(distributor_id))
            .order_by_desc(entries::Column::Id)
            .all(&self.db)
            .await
    }

    /// Entries matching a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_key(&self, key: &EntryKey) -> Result<Vec<entries::Model>, DbErr> {
        entries::Entity::find()
            .filter(entries::Column::DocumentNumber.eq(key.document_number.as_str()))
            .filter(entries::Column::ContactNumber.eq(key.contact_number.as_str()))
            .order_by_desc(entries::Column::Id)
            .all(&self.db)
            .await
    }

    /// Operator work queue: entries not started, processing, or on hold.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn open_queue(&self) -> Result<Vec<entries::Model>, DbErr> {
        entries::Entity::find()
            .filter(
                entries::Column::Status.is_in(
                    CoreStatus::ALL
                        .into_iter()
                        .filter(CoreStatus::is_queued)
                        .map(core_status_to_db),
                ),
            )
            .order_by_desc(entries::Column::Id)
            .all(&self.db)
            .await
    }

    /// Ids of entries currently in processing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn processing_ids(&self) -> Result<Vec<i64>, DbErr> {
        entries::Entity::find()
            .select_only()
            .column(entries::Column::Id)
            .filter(entries::Column::Status.eq(EntryStatus::Processing))
            .order_by_desc(entries::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Latest entry a retailer submitted for a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest_for_submitter(
        &self,
        submitter: &str,
        key: &EntryKey,
    ) -> Result<Option<entries::Model>, DbErr> {
        entries::Entity::find()
            .filter(entries::Column::Submitter.eq(submitter))
            .filter(entries::Column::DocumentNumber.eq(key.document_number.as_str()))
            .filter(entries::Column::ContactNumber.eq(key.contact_number.as_str()))
            .order_by_desc(entries::Column::Id)
            .one(&self.db)
            .await
    }
}
