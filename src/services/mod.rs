//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

pub mod container;
mod registration_service;
mod token_service;
pub mod validation;
mod verification_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use registration_service::{Registrar, RegistrationService, RegistrationStage};
pub use token_service::{ConfirmationClaims, TokenError, TokenService};
pub use validation::{decode_submission, Submission, ValidationPipeline, Validator};
pub use verification_service::{VerificationOutcome, VerificationService, Verifier};

#[cfg(any(test, feature = "test-utils"))]
pub use registration_service::MockRegistrationService;
#[cfg(any(test, feature = "test-utils"))]
pub use verification_service::MockVerificationService;
