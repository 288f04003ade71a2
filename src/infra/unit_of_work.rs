//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns the transaction lifecycle, so a
//! sign-up writes its customer, profile, plan and insurance rows atomically.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, IsolationLevel, QueryFilter, Set, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{customer, insurance, insurance_plan, profile};
use super::repositories::{BlacklistRepository, BlacklistStore, CustomerRepository, CustomerStore};
use crate::domain::{Enrollment, NewEnrollment};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to the generic method.
/// For testing, mock at the service level or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get customer repository
    fn customers(&self) -> Arc<dyn CustomerRepository>;

    /// Get blacklist repository
    fn blacklist(&self) -> Arc<dyn BlacklistRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get customer repository for this transaction
    pub fn customers(&self) -> TxCustomerRepository<'_> {
        TxCustomerRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    customer_repo: Arc<CustomerStore>,
    blacklist_repo: Arc<BlacklistStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let customer_repo = Arc::new(CustomerStore::new(db.clone()));
        let blacklist_repo = Arc::new(BlacklistStore::new(db.clone()));
        Self {
            db,
            customer_repo,
            blacklist_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn customers(&self) -> Arc<dyn CustomerRepository> {
        self.customer_repo.clone()
    }

    fn blacklist(&self) -> Arc<dyn BlacklistRepository> {
        self.blacklist_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware customer repository.
///
/// Executes all operations within the borrowed transaction.
pub struct TxCustomerRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCustomerRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert the customer, its inactive profile, the plan and the insurance.
    ///
    /// With `reuse_plan` an existing plan row with the same name is linked
    /// instead of inserting a new one. A unique-email violation becomes
    /// [`AppError::AlreadyRegistered`], which covers two concurrent sign-ups
    /// that both passed the duplicate check.
    pub async fn create_enrollment(
        &self,
        enrollment: NewEnrollment,
        reuse_plan: bool,
    ) -> AppResult<Enrollment> {
        let now = chrono::Utc::now();
        let customer_id = Uuid::new_v4();

        customer::ActiveModel {
            id: Set(customer_id),
            customer_name: Set(enrollment.customer_name.clone()),
            email_address: Set(enrollment.email_address.clone()),
            password_hash: Set(enrollment.password_hash),
            created_at: Set(now),
        }
        .insert(self.txn)
        .await
        .map_err(|e| unique_violation_as_registered(e, &enrollment.email_address))?;

        profile::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer_id),
            activated: Set(false),
            updated_at: Set(now),
        }
        .insert(self.txn)
        .await
        .map_err(AppError::from)?;

        let plan_id = self
            .plan_id(&enrollment.insurance_plan_name, reuse_plan)
            .await?;

        insurance::ActiveModel {
            id: Set(Uuid::new_v4()),
            insured_amount: Set(enrollment.insured_amount),
            customer_id: Set(customer_id),
            insurance_plan_id: Set(plan_id),
        }
        .insert(self.txn)
        .await
        .map_err(AppError::from)?;

        Ok(Enrollment {
            customer_name: enrollment.customer_name,
            email_address: enrollment.email_address,
            insurance_plan: enrollment.insurance_plan_name,
            insurance_amount: enrollment.insured_amount,
        })
    }

    async fn plan_id(&self, name: &str, reuse_plan: bool) -> AppResult<Uuid> {
        if reuse_plan {
            let existing = insurance_plan::Entity::find()
                .filter(insurance_plan::Column::InsurancePlanName.eq(name))
                .one(self.txn)
                .await
                .map_err(AppError::from)?;

            if let Some(plan) = existing {
                return Ok(plan.id);
            }
        }

        let plan = insurance_plan::ActiveModel {
            id: Set(Uuid::new_v4()),
            insurance_plan_name: Set(name.to_string()),
        }
        .insert(self.txn)
        .await
        .map_err(AppError::from)?;

        Ok(plan.id)
    }
}

fn unique_violation_as_registered(err: DbErr, email: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::AlreadyRegistered(email.to_string()),
        _ => AppError::from(err),
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
