//! Notice repository for broadcast messages.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};

use crate::entities::notices;

use super::Clock;

/// Notice repository.
#[derive(Debug, Clone)]
pub struct NoticeRepository {
    db: DatabaseConnection,
    clock: Clock,
}

impl NoticeRepository {
    /// Creates a new notice repository.
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

    /// Most recent notice (the update check).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest(&self) -> Result<Option<notices::Model>, DbErr> {
        notices::Entity::find()
            .order_by_desc(notices::Column::Id)
            .one(&self.db)
            .await
    }

    /// Appends a notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn publish(&self, title: &str, message: &str) -> Result<notices::Model, DbErr> {
        notices::ActiveModel {
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            created_at: Set(self.clock.now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }
}
