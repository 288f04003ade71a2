//! Verification service - Email confirmation workflow.

use async_trait::async_trait;
use std::sync::Arc;

use super::token_service::TokenService;
use crate::config::Config;
use crate::domain::Activation;
use crate::errors::{AppError, AppResult};
use crate::infra::CustomerRepository;
use crate::jobs::{MailDispatcher, WelcomeEmail};
use crate::types::StatusResponse;

/// Successful confirmation outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The profile was activated by this request
    Activated { email: String },
    /// The profile was active before this request
    AlreadyActivated { email: String },
}

impl From<VerificationOutcome> for StatusResponse {
    fn from(outcome: VerificationOutcome) -> Self {
        match outcome {
            VerificationOutcome::Activated { email } => StatusResponse::new(
                "Success",
                format!(
                    "Thanks for the registration. You will soon receive a welcome email on your email '{}'.",
                    email
                ),
            ),
            VerificationOutcome::AlreadyActivated { email } => StatusResponse::new(
                "ALREADY-ACTIVATED",
                format!("User with Email '{}' is already activated.", email),
            ),
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait VerificationService: Send + Sync {
    /// Confirm the email address behind `token` and activate its profile.
    async fn confirm(&self, token: &str) -> AppResult<VerificationOutcome>;
}

pub struct Verifier {
    customers: Arc<dyn CustomerRepository>,
    tokens: TokenService,
    mail: Arc<dyn MailDispatcher>,
    mail_sender: String,
}

impl Verifier {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        mail: Arc<dyn MailDispatcher>,
        config: &Config,
    ) -> Self {
        Self {
            customers,
            tokens: TokenService::new(config),
            mail,
            mail_sender: config.mail_default_sender.clone(),
        }
    }

    fn queue_welcome_email(&self, customer_name: &str, email: &str) {
        let job = WelcomeEmail {
            customer_name,
            email_address: email,
        }
        .into_job(&self.mail_sender);

        match job {
            Ok(job) => {
                if !self.mail.enqueue(job) {
                    tracing::warn!(email = %email, "Welcome email was not accepted");
                }
            }
            Err(e) => tracing::error!(email = %email, error = %e, "Failed to render welcome email"),
        }
    }
}

#[async_trait]
impl VerificationService for Verifier {
    async fn confirm(&self, token: &str) -> AppResult<VerificationOutcome> {
        let email = self.tokens.verify(token).map_err(|e| {
            tracing::info!(reason = %e, "Confirmation token rejected");
            AppError::from(e)
        })?;

        let customer = self
            .customers
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound(email.clone()))?;

        let profile = self
            .customers
            .find_profile(customer.id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Customer {} has no profile", customer.id)))?;

        if profile.activated {
            tracing::info!(email = %email, "Profile already activated");
            return Ok(VerificationOutcome::AlreadyActivated { email });
        }

        match self.customers.activate_profile(customer.id).await? {
            Activation::Activated => {
                tracing::info!(email = %email, "Profile activated");
                self.queue_welcome_email(&customer.customer_name, &email);
                Ok(VerificationOutcome::Activated { email })
            }
            Activation::AlreadyActive => {
                tracing::info!(email = %email, "Profile activated concurrently");
                Ok(VerificationOutcome::AlreadyActivated { email })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domain::{Customer, Profile};
    use crate::infra::MockCustomerRepository;
    use crate::jobs::MockMailDispatcher;

    fn config() -> Config {
        Config::with_secret("verification-test-secret-0123456789")
    }

    fn customer(id: Uuid) -> Customer {
        Customer {
            id,
            customer_name: "Jane Doe".into(),
            email_address: "jane@example.com".into(),
            password_hash: "hash".into(),
            created_at: Utc::now(),
        }
    }

    fn profile(customer_id: Uuid, activated: bool) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            customer_id,
            activated,
            updated_at: Utc::now(),
        }
    }

    fn known_customer(activated: bool) -> (MockCustomerRepository, Uuid) {
        let id = Uuid::new_v4();
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(customer(id))));
        repo.expect_find_profile()
            .returning(move |cid| Ok(Some(profile(cid, activated))));
        (repo, id)
    }

    fn token(email: &str) -> String {
        TokenService::new(&config()).issue(email).unwrap()
    }

    #[tokio::test]
    async fn test_first_confirmation_activates_and_sends_welcome() {
        let (mut repo, id) = known_customer(false);
        repo.expect_activate_profile()
            .withf(move |cid| *cid == id)
            .times(1)
            .returning(|_| Ok(Activation::Activated));

        let mut mail = MockMailDispatcher::new();
        mail.expect_enqueue()
            .withf(|job| job.recipient == "jane@example.com" && job.subject == "Welcome to Indian Insurance")
            .times(1)
            .returning(|_| true);

        let verifier = Verifier::new(Arc::new(repo), Arc::new(mail), &config());
        let outcome = verifier.confirm(&token("jane@example.com")).await.unwrap();

        assert_eq!(
            outcome,
            VerificationOutcome::Activated {
                email: "jane@example.com".into()
            }
        );
        assert_eq!(StatusResponse::from(outcome).status, "Success");
    }

    #[tokio::test]
    async fn test_already_active_makes_no_write() {
        let (mut repo, _) = known_customer(true);
        repo.expect_activate_profile().never();
        let mut mail = MockMailDispatcher::new();
        mail.expect_enqueue().never();

        let verifier = Verifier::new(Arc::new(repo), Arc::new(mail), &config());
        let outcome = verifier.confirm(&token("jane@example.com")).await.unwrap();

        let body = StatusResponse::from(outcome);
        assert_eq!(body.status, "ALREADY-ACTIVATED");
        assert_eq!(body.reason, "User with Email 'jane@example.com' is already activated.");
    }

    #[tokio::test]
    async fn test_lost_activation_race_reports_already_activated() {
        let (mut repo, _) = known_customer(false);
        repo.expect_activate_profile()
            .returning(|_| Ok(Activation::AlreadyActive));
        let mut mail = MockMailDispatcher::new();
        mail.expect_enqueue().never();

        let verifier = Verifier::new(Arc::new(repo), Arc::new(mail), &config());
        let outcome = verifier.confirm(&token("jane@example.com")).await.unwrap();

        assert!(matches!(outcome, VerificationOutcome::AlreadyActivated { .. }));
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_activate_profile().never();

        let verifier = Verifier::new(Arc::new(repo), Arc::new(MockMailDispatcher::new()), &config());
        let err = verifier.confirm(&token("ghost@example.com")).await.unwrap_err();

        assert_eq!(err.kind(), "INVALID-USER");
        assert_eq!(err.to_string(), "User with Email 'ghost@example.com' is not found.");
    }

    #[tokio::test]
    async fn test_expired_token_touches_nothing() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_email().never();
        repo.expect_activate_profile().never();

        let stale = TokenService::new(&config())
            .issue_at("jane@example.com", Utc::now() - Duration::seconds(600))
            .unwrap();

        let verifier = Verifier::new(Arc::new(repo), Arc::new(MockMailDispatcher::new()), &config());
        let err = verifier.confirm(&stale).await.unwrap_err();

        assert_eq!(err.kind(), "VERIFICATION-EXPIRED");
    }

    #[tokio::test]
    async fn test_forged_token_rejected() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_email().never();

        let foreign = TokenService::new(&Config::with_secret("someone-elses-secret-key-0123456789"))
            .issue("jane@example.com")
            .unwrap();

        let verifier = Verifier::new(Arc::new(repo), Arc::new(MockMailDispatcher::new()), &config());
        assert!(matches!(
            verifier.confirm(&foreign).await,
            Err(AppError::TokenInvalidOrExpired)
        ));
    }
}
