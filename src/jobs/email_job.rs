//! Email background job.
//!
//! Jobs are pushed by the web process and consumed by `jobs work`. With SMTP
//! configured the worker delivers through lettre, otherwise it logs the
//! message and acknowledges the job.

use apalis::prelude::Data;
use lettre::{
    message::header::ContentType,
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SmtpConfig;

/// Email job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

impl EmailJob {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }
}

/// Errors that can occur when delivering an email job.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Outbound transport shared by the worker.
///
/// `None` means SMTP is not configured and messages are only logged.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl Mailer {
    /// Build the transport from SMTP settings.
    ///
    /// # Errors
    /// Returns error if the relay cannot be set up.
    pub fn from_config(smtp: &SmtpConfig) -> Result<Self, MailError> {
        let Some(host) = smtp.host.as_deref() else {
            return Ok(Self::log_only());
        };

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(smtp.port);

        if let Some(username) = smtp.username.clone() {
            let password = smtp.password().unwrap_or_default().to_string();
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: Some(builder.build()),
        })
    }

    /// A mailer that logs messages instead of sending them.
    pub fn log_only() -> Self {
        Self { transport: None }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// Deliver a single job.
    pub async fn deliver(&self, job: &EmailJob) -> Result<(), MailError> {
        let Some(transport) = &self.transport else {
            // Development mode: log the email instead of sending
            tracing::warn!("SMTP not configured - logging email instead of sending");
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                job.sender,
                job.recipient,
                job.subject,
                job.html_body
            );
            return Ok(());
        };

        let message = build_message(job)?;
        transport.send(message).await?;

        tracing::info!(to = %job.recipient, subject = %job.subject, "Email sent successfully");
        Ok(())
    }
}

fn build_message(job: &EmailJob) -> Result<Message, MailError> {
    let message = Message::builder()
        .from(
            job.sender
                .parse()
                .map_err(|_| MailError::InvalidAddress(job.sender.clone()))?,
        )
        .to(job
            .recipient
            .parse()
            .map_err(|_| MailError::InvalidAddress(job.recipient.clone()))?)
        .subject(&job.subject)
        .header(ContentType::TEXT_HTML)
        .body(job.html_body.clone())?;

    Ok(message)
}

/// Email job handler - processes email sending jobs.
///
/// An error makes apalis retry the job according to the worker's policy.
pub async fn send_email(job: EmailJob, mailer: Data<Mailer>) -> Result<(), MailError> {
    tracing::info!(
        to = %job.recipient,
        from = %job.sender,
        subject = %job.subject,
        "Processing email job"
    );

    if let Err(e) = mailer.deliver(&job).await {
        tracing::error!(to = %job.recipient, error = %e, "Email delivery failed");
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> EmailJob {
        EmailJob::new(
            "noreply@example.com",
            "jane@example.com",
            "Please verify your email",
            "<p>Hello</p>",
        )
    }

    #[test]
    fn test_job_serializes_for_queue() {
        let json = serde_json::to_value(job()).unwrap();
        assert_eq!(json["recipient"], "jane@example.com");
        assert_eq!(json["html_body"], "<p>Hello</p>");

        let back: EmailJob = serde_json::from_value(json).unwrap();
        assert_eq!(back, job());
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let mut bad = job();
        bad.recipient = "not an address".into();

        assert!(matches!(
            build_message(&bad),
            Err(MailError::InvalidAddress(addr)) if addr == "not an address"
        ));
    }

    #[test]
    fn test_from_config_without_host_is_log_only() {
        let mailer = Mailer::from_config(&SmtpConfig::default()).unwrap();
        assert!(!mailer.is_configured());
    }

    #[tokio::test]
    async fn test_log_only_delivery_succeeds() {
        assert!(Mailer::log_only().deliver(&job()).await.is_ok());
    }
}
