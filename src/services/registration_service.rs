//! Registration service - Sign-up workflow.
//!
//! Validates the submission, creates the account atomically, issues a
//! confirmation token and queues the verification email.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use super::token_service::TokenService;
use super::validation::{Submission, ValidationPipeline};
use crate::config::Config;
use crate::domain::{Enrollment, NewEnrollment, Password, PasswordGenerator};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::jobs::{confirm_url, MailDispatcher, VerificationEmail};
use crate::with_transaction;

/// Progress of a single sign-up, logged at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStage {
    Received,
    Validated,
    PersistedUser,
    TokenIssued,
    EmailQueued,
    Complete,
    Failed,
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            RegistrationStage::Received => "received",
            RegistrationStage::Validated => "validated",
            RegistrationStage::PersistedUser => "persisted_user",
            RegistrationStage::TokenIssued => "token_issued",
            RegistrationStage::EmailQueued => "email_queued",
            RegistrationStage::Complete => "complete",
            RegistrationStage::Failed => "failed",
        };
        f.write_str(stage)
    }
}

/// Registration service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a customer from a raw submission.
    async fn register(&self, submission: Submission) -> AppResult<Enrollment>;
}

/// Concrete implementation of RegistrationService using Unit of Work.
pub struct Registrar<U: UnitOfWork> {
    uow: Arc<U>,
    pipeline: ValidationPipeline,
    passwords: PasswordGenerator,
    tokens: TokenService,
    mail: Arc<dyn MailDispatcher>,
    config: Config,
}

impl<U: UnitOfWork> Registrar<U> {
    pub fn new(uow: Arc<U>, mail: Arc<dyn MailDispatcher>, config: Config) -> Self {
        let pipeline = ValidationPipeline::standard(&config, uow.customers(), uow.blacklist());
        Self {
            pipeline,
            passwords: PasswordGenerator::new(config.password_length),
            tokens: TokenService::new(&config),
            uow,
            mail,
            config,
        }
    }

    async fn run(&self, submission: Submission, email: &mut Option<String>) -> AppResult<Enrollment> {
        let request = self.pipeline.accept(&submission).await?;
        *email = Some(request.email_address.clone());
        log_stage(email, RegistrationStage::Validated);

        let plain_password = self
            .passwords
            .generate()
            .map_err(|e| AppError::internal(format!("Password generation failed: {}", e)))?;
        let password_hash = Password::new(&plain_password)?.into_string();

        let new_enrollment = NewEnrollment {
            customer_name: request.customer_name,
            email_address: request.email_address,
            password_hash,
            insurance_plan_name: request.insurance_plan_name,
            insured_amount: request.insured_amount,
        };
        let reuse_plan = self.config.plan_deduplication;

        let enrollment = with_transaction!(self.uow, |ctx| {
            ctx.customers()
                .create_enrollment(new_enrollment, reuse_plan)
                .await
        })?;
        log_stage(email, RegistrationStage::PersistedUser);

        // The account stays in place if signing fails; the customer cannot confirm it
        let token = self.tokens.issue(&enrollment.email_address)?;
        log_stage(email, RegistrationStage::TokenIssued);

        if self.queue_verification_email(&enrollment, &plain_password, &token) {
            log_stage(email, RegistrationStage::EmailQueued);
        }

        Ok(enrollment)
    }

    fn queue_verification_email(&self, enrollment: &Enrollment, password: &str, token: &str) -> bool {
        let link = confirm_url(&self.config.app_base_url, token);
        let job = VerificationEmail {
            customer_name: &enrollment.customer_name,
            email_address: &enrollment.email_address,
            password,
            confirm_url: &link,
            expires_in_secs: self.config.email_token_expiration_secs,
        }
        .into_job(&self.config.mail_default_sender);

        match job {
            Ok(job) => {
                let accepted = self.mail.enqueue(job);
                if !accepted {
                    tracing::warn!(email = %enrollment.email_address, "Verification email was not accepted");
                }
                accepted
            }
            Err(e) => {
                tracing::error!(email = %enrollment.email_address, error = %e, "Failed to render verification email");
                false
            }
        }
    }
}

fn log_stage(email: &Option<String>, stage: RegistrationStage) {
    tracing::info!(email = email.as_deref().unwrap_or("-"), %stage, "Registration advanced");
}

#[async_trait]
impl<U: UnitOfWork> RegistrationService for Registrar<U> {
    async fn register(&self, submission: Submission) -> AppResult<Enrollment> {
        let mut email = None;
        log_stage(&email, RegistrationStage::Received);

        match self.run(submission, &mut email).await {
            Ok(enrollment) => {
                log_stage(&email, RegistrationStage::Complete);
                Ok(enrollment)
            }
            Err(e) => {
                tracing::warn!(
                    email = email.as_deref().unwrap_or("-"),
                    stage = %RegistrationStage::Failed,
                    reason = %e,
                    "Registration failed"
                );
                Err(e)
            }
        }
    }
}
