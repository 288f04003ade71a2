//! Jobs command - Email job queue management.
//!
//! - `work`: Start the email worker process
//! - `list`: Show job counts per status
//! - `clear`: Remove failed jobs from the queue
//!
//! ## Usage
//!
//! ```bash
//! insurance-signup jobs work
//! insurance-signup jobs list
//! insurance-signup jobs clear
//! ```

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, EMAIL_JOB_RETRIES, JOB_NAME_EMAIL};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Start the email worker.
///
/// Failed deliveries are retried by apalis up to [`EMAIL_JOB_RETRIES`] times.
async fn run_worker(config: &Config) -> AppResult<()> {
    use apalis::layers::retry::RetryPolicy;
    use apalis::prelude::*;

    use crate::jobs::{email_storage, send_email, Mailer};

    tracing::info!("Connecting to job queue...");
    let storage = email_storage(&config.database_url).await?;

    let mailer = Mailer::from_config(&config.smtp)
        .map_err(|e| AppError::internal(format!("Failed to set up SMTP transport: {}", e)))?;
    if !mailer.is_configured() {
        tracing::warn!("SMTP_HOST not set, emails will be logged instead of sent");
    }

    let worker = WorkerBuilder::new(JOB_NAME_EMAIL)
        .data(mailer)
        .retry(RetryPolicy::retries(EMAIL_JOB_RETRIES))
        .backend(storage)
        .build_fn(send_email);

    tracing::info!("Email worker started. Press Ctrl+C to stop.");

    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::internal(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Email worker stopped.");
    Ok(())
}

/// Whether `jobs work` (or `serve`) has created the apalis schema yet.
async fn queue_exists(db: &DatabaseConnection) -> AppResult<bool> {
    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') as exists",
        ))
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false))
}

/// List job counts per status.
async fn list_jobs(config: &Config) -> AppResult<()> {
    let database = Database::connect_without_migrations(config).await?;
    let db = database.connection();

    if !queue_exists(db).await? {
        println!("Job queue not initialized. Run 'jobs work' or 'serve' first.");
        return Ok(());
    }

    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT status::text as status, COUNT(*)::bigint as count FROM apalis.jobs GROUP BY status",
        ))
        .await?;

    println!("\n=== Email Job Queue ===");
    for status in ["Pending", "Running", "Failed", "Done", "Killed"] {
        let count = rows
            .iter()
            .find(|row| row.try_get::<String>("", "status").ok().as_deref() == Some(status))
            .and_then(|row| row.try_get::<i64>("", "count").ok())
            .unwrap_or(0);
        println!("{:<9} {}", format!("{}:", status), count);
    }
    println!("=======================\n");

    Ok(())
}

/// Clear failed jobs from the queue
async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let database = Database::connect_without_migrations(config).await?;
    let db = database.connection();

    if !queue_exists(db).await? {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    }

    let result = db
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status IN ('Failed', 'Killed')",
        ))
        .await?;

    println!("Cleared {} failed job(s) from the queue.", result.rows_affected());
    Ok(())
}
