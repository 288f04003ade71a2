//! Blacklist command - Seed and inspect the email blacklist.
//!
//! There is no HTTP surface for the blacklist; operators manage it here.

use crate::cli::args::{BlacklistAction, BlacklistArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{BlacklistRepository, BlacklistStore, Database};
use crate::services::validation::EmailRule;

/// Execute the blacklist command
pub async fn execute(args: BlacklistArgs, config: Config) -> AppResult<()> {
    let database = Database::connect(&config).await?;
    let store = BlacklistStore::new(database.get_connection());

    match args.action {
        BlacklistAction::Add { email, reason } => {
            let email = normalized(&email)?;
            let entry = store.add(email, reason).await?;
            tracing::info!(email = %entry.email_address, "Email blacklisted");
            println!("Blacklisted {}", entry.email_address);
        }
        BlacklistAction::Check { email } => {
            let email = normalized(&email)?;
            match store.find_by_email(&email).await? {
                Some(entry) => println!(
                    "{} is blacklisted ({})",
                    entry.email_address,
                    entry.reason.as_deref().unwrap_or("no reason given")
                ),
                None => println!("{} is not blacklisted", email),
            }
        }
    }

    Ok(())
}

fn normalized(email: &str) -> AppResult<String> {
    use validator::ValidateEmail;

    let email = EmailRule::normalize(email);
    if !email.validate_email() {
        return Err(AppError::validation(format!("'{}' is not a valid email address", email)));
    }
    Ok(email)
}
