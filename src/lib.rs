//! Insurance sign-up backend.
//!
//! Customers register with their name, email, plan and insured amount. The
//! service generates a password, stores the account inactive and mails a
//! time-limited confirmation link. Following the link activates the account.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Customers, profiles, credentials
//! - **services**: Validation pipeline, token service, sign-up and confirmation workflows
//! - **infra**: Database, migrations, repositories, unit of work
//! - **jobs**: Email jobs, the queue dispatcher and the worker handler
//! - **api**: HTTP handlers and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! insurance-signup serve
//!
//! # Run migrations
//! insurance-signup migrate up
//!
//! # Deliver queued emails
//! insurance-signup jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Enrollment, Password, PasswordGenerator, SignUpRequest};
pub use errors::{AppError, AppResult};
