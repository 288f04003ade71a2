//! Application state - Dependency injection container.
//!
//! Provides centralized access to the sign-up services and the database.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::jobs::MailDispatcher;
use crate::services::{RegistrationService, ServiceContainer, Services, VerificationService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Sign-up workflow
    pub registration_service: Arc<dyn RegistrationService>,
    /// Email confirmation workflow
    pub verification_service: Arc<dyn VerificationService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from the database, a mail dispatcher and config.
    pub fn from_config(
        database: Arc<Database>,
        mail: Arc<dyn MailDispatcher>,
        config: Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), mail, config);

        Self {
            registration_service: container.registration(),
            verification_service: container.verification(),
            database,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        registration_service: Arc<dyn RegistrationService>,
        verification_service: Arc<dyn VerificationService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            registration_service,
            verification_service,
            database,
        }
    }
}
