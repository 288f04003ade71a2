//! Customer repository: lookups and profile activation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use super::entities::customer::{self, Entity as CustomerEntity};
use super::entities::profile::{self, Entity as ProfileEntity};
use crate::domain::{Activation, Customer, Profile};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Customer repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find customer by normalized email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>>;

    /// Find the activation profile of a customer
    async fn find_profile(&self, customer_id: Uuid) -> AppResult<Option<Profile>>;

    /// Flip the profile to active.
    ///
    /// A single conditional update, so concurrent confirmations activate once.
    async fn activate_profile(&self, customer_id: Uuid) -> AppResult<Activation>;
}

/// Concrete implementation of CustomerRepository
pub struct CustomerStore {
    db: DatabaseConnection,
}

impl CustomerStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerRepository for CustomerStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        let result = CustomerEntity::find()
            .filter(customer::Column::EmailAddress.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Customer::from))
    }

    async fn find_profile(&self, customer_id: Uuid) -> AppResult<Option<Profile>> {
        let result = ProfileEntity::find()
            .filter(profile::Column::CustomerId.eq(customer_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Profile::from))
    }

    async fn activate_profile(&self, customer_id: Uuid) -> AppResult<Activation> {
        let result = ProfileEntity::update_many()
            .col_expr(profile::Column::Activated, Expr::value(true))
            .col_expr(profile::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(profile::Column::CustomerId.eq(customer_id))
            .filter(profile::Column::Activated.eq(false))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected > 0 {
            return Ok(Activation::Activated);
        }

        // Nothing flipped: either already active or the profile row is missing
        match self.find_profile(customer_id).await? {
            Some(_) => Ok(Activation::AlreadyActive),
            None => Err(AppError::internal(format!(
                "Customer {} has no profile",
                customer_id
            ))),
        }
    }
}
