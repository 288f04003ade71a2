//! Background jobs.
//!
//! The web process only enqueues; delivery happens in the `jobs work` worker.

pub mod email_job;
pub mod mail_queue;
pub mod messages;

pub use email_job::{send_email, EmailJob, MailError, Mailer};
pub use mail_queue::{email_storage, MailDispatcher, MailQueue};
pub use messages::{confirm_url, VerificationEmail, WelcomeEmail};

#[cfg(any(test, feature = "test-utils"))]
pub use mail_queue::MockMailDispatcher;
