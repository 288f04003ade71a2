//! Blacklist repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::blacklist::{self, ActiveModel, Entity as BlacklistEntity};
use crate::domain::BlacklistEntry;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BlacklistRepository: Send + Sync {
    /// Find a blacklist entry by normalized email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<BlacklistEntry>>;

    /// Bar an email address from registering. Adding an existing address is a no-op.
    async fn add(&self, email: String, reason: Option<String>) -> AppResult<BlacklistEntry>;
}

pub struct BlacklistStore {
    db: DatabaseConnection,
}

impl BlacklistStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlacklistRepository for BlacklistStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<BlacklistEntry>> {
        let result = BlacklistEntity::find()
            .filter(blacklist::Column::EmailAddress.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(BlacklistEntry::from))
    }

    async fn add(&self, email: String, reason: Option<String>) -> AppResult<BlacklistEntry> {
        if let Some(existing) = self.find_by_email(&email).await? {
            return Ok(existing);
        }

        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email_address: Set(email),
            reason: Set(reason),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(BlacklistEntry::from(model))
    }
}
