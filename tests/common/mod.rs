//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite database with the production
//! migrations applied, plus a mail dispatcher that records jobs.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, Statement,
};
use sea_orm_migration::MigratorTrait;

use insurance_signup::api::{create_router, AppState};
use insurance_signup::config::Config;
use insurance_signup::infra::{Database, Migrator};
use insurance_signup::jobs::{EmailJob, MailDispatcher};

pub const TEST_SECRET: &str = "integration-test-secret-key-0123456789";

/// Mail dispatcher that keeps every accepted job in memory.
#[derive(Default)]
pub struct RecordingMail {
    jobs: Mutex<Vec<EmailJob>>,
}

impl RecordingMail {
    pub fn jobs(&self) -> Vec<EmailJob> {
        self.jobs.lock().unwrap().clone()
    }
}

impl MailDispatcher for RecordingMail {
    fn enqueue(&self, job: EmailJob) -> bool {
        self.jobs.lock().unwrap().push(job);
        true
    }
}

pub fn config() -> Config {
    Config::with_secret(TEST_SECRET)
}

pub async fn database() -> DatabaseConnection {
    // One connection: every pooled connection would otherwise get its own empty database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = SeaDatabase::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub struct TestApp {
    pub router: Router,
    pub mail: Arc<RecordingMail>,
    pub db: DatabaseConnection,
    pub config: Config,
}

pub async fn app() -> TestApp {
    app_with(config()).await
}

pub async fn app_with(config: Config) -> TestApp {
    let db = database().await;
    let mail = Arc::new(RecordingMail::default());
    let dispatcher: Arc<dyn MailDispatcher> = mail.clone();

    let state = AppState::from_config(
        Arc::new(Database::from_connection(db.clone())),
        dispatcher,
        config.clone(),
    );

    TestApp {
        router: create_router(state),
        mail,
        db,
        config,
    }
}

pub async fn count(db: &DatabaseConnection, table: &str) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            format!("SELECT COUNT(*) AS n FROM {}", table),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

pub fn jane_doe() -> serde_json::Value {
    serde_json::json!({
        "customer_name": "Jane Doe",
        "email_address": "jane@example.com",
        "insurance_plan_name": "Family",
        "insured_amount": 300000
    })
}
