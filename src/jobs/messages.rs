//! Customer-facing email bodies, rendered from `templates/email`.

use askama::Template;

use super::email_job::EmailJob;
use crate::config::{VERIFICATION_EMAIL_SUBJECT, WELCOME_EMAIL_SUBJECT};

/// Verification email carrying the generated credentials and confirm link.
#[derive(Template)]
#[template(path = "email/verification.html")]
pub struct VerificationEmail<'a> {
    pub customer_name: &'a str,
    pub email_address: &'a str,
    pub password: &'a str,
    pub confirm_url: &'a str,
    pub expires_in_secs: i64,
}

impl VerificationEmail<'_> {
    pub fn into_job(self, sender: &str) -> Result<EmailJob, askama::Error> {
        let body = self.render()?;
        Ok(EmailJob::new(
            sender,
            self.email_address,
            VERIFICATION_EMAIL_SUBJECT,
            body,
        ))
    }
}

/// Welcome email sent once the profile is activated.
#[derive(Template)]
#[template(path = "email/welcome.html")]
pub struct WelcomeEmail<'a> {
    pub customer_name: &'a str,
    pub email_address: &'a str,
}

impl WelcomeEmail<'_> {
    pub fn into_job(self, sender: &str) -> Result<EmailJob, askama::Error> {
        let body = self.render()?;
        Ok(EmailJob::new(
            sender,
            self.email_address,
            WELCOME_EMAIL_SUBJECT,
            body,
        ))
    }
}

/// Link the customer follows to activate the account.
pub fn confirm_url(app_base_url: &str, token: &str) -> String {
    format!("{}/user/confirm/{}", app_base_url.trim_end_matches('/'), token)
}
