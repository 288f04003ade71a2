//! Service Container - Centralized service access.
//!
//! Wires the stores, the mail dispatcher and config into the sign-up services.

use std::sync::Arc;

use super::{RegistrationService, VerificationService};
use crate::config::Config;
use crate::infra::{Persistence, UnitOfWork};
use crate::jobs::MailDispatcher;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get registration service
    fn registration(&self) -> Arc<dyn RegistrationService>;

    /// Get verification service
    fn verification(&self) -> Arc<dyn VerificationService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    registration_service: Arc<dyn RegistrationService>,
    verification_service: Arc<dyn VerificationService>,
}

impl Services {
    /// Create service container from database connection, mail dispatcher and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        mail: Arc<dyn MailDispatcher>,
        config: Config,
    ) -> Self {
        use super::{Registrar, Verifier};

        let uow = Arc::new(Persistence::new(db));
        let verification_service = Arc::new(Verifier::new(uow.customers(), mail.clone(), &config));
        let registration_service = Arc::new(Registrar::new(uow, mail, config));

        Self {
            registration_service,
            verification_service,
        }
    }
}

impl ServiceContainer for Services {
    fn registration(&self) -> Arc<dyn RegistrationService> {
        self.registration_service.clone()
    }

    fn verification(&self) -> Arc<dyn VerificationService> {
        self.verification_service.clone()
    }
}
