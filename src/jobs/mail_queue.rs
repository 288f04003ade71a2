//! Fire-and-forget mail dispatch from request handlers.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;
use tokio::runtime::Handle;

use super::email_job::EmailJob;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Accepts outbound mail without waiting for delivery.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait MailDispatcher: Send + Sync {
    /// Hand a job over for asynchronous delivery.
    ///
    /// Returns whether the job was accepted. Never blocks on the queue.
    fn enqueue(&self, job: EmailJob) -> bool;
}

/// Production dispatcher pushing jobs into the apalis PostgreSQL queue.
#[derive(Clone)]
pub struct MailQueue {
    storage: PostgresStorage<EmailJob>,
}

impl MailQueue {
    pub fn new(storage: PostgresStorage<EmailJob>) -> Self {
        Self { storage }
    }
}

/// Open the email job storage, creating the apalis tables when missing.
pub async fn email_storage(database_url: &str) -> AppResult<PostgresStorage<EmailJob>> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to job queue: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    Ok(PostgresStorage::new(pool))
}

impl MailDispatcher for MailQueue {
    fn enqueue(&self, job: EmailJob) -> bool {
        let Ok(handle) = Handle::try_current() else {
            tracing::error!(to = %job.recipient, "No async runtime, email job dropped");
            return false;
        };

        let mut storage = self.storage.clone();
        handle.spawn(async move {
            let recipient = job.recipient.clone();
            match storage.push(job).await {
                Ok(_) => tracing::debug!(to = %recipient, "Email job queued"),
                Err(e) => tracing::error!(to = %recipient, error = %e, "Failed to queue email job"),
            }
        });

        true
    }
}
