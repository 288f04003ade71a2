//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use super::constants::{
    DEFAULT_APP_BASE_URL, DEFAULT_DATABASE_URL, DEFAULT_EMAIL_TOKEN_EXPIRATION_SECS,
    DEFAULT_MAIL_SENDER, DEFAULT_MAX_INSURED_AMOUNT, DEFAULT_MAX_NAME_SPACES,
    DEFAULT_PASSWORD_LENGTH, DEFAULT_SECURITY_PASSWORD_SALT, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEFAULT_SMTP_PORT, MIN_SECRET_KEY_LENGTH,
};

/// SMTP transport settings, consumed by the email worker only.
#[derive(Clone, Default)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    password: Option<String>,
}

impl SmtpConfig {
    /// Whether a relay host is configured.
    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Application configuration
///
/// Loaded once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    secret_key: String,
    pub security_password_salt: String,
    pub email_token_expiration_secs: i64,
    pub password_length: usize,
    pub max_insured_amount: i64,
    pub max_name_spaces: usize,
    pub plan_deduplication: bool,
    pub mail_default_sender: String,
    pub app_base_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub smtp: SmtpConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("security_password_salt", &"[REDACTED]")
            .field("email_token_expiration_secs", &self.email_token_expiration_secs)
            .field("password_length", &self.password_length)
            .field("max_insured_amount", &self.max_insured_amount)
            .field("max_name_spaces", &self.max_name_spaces)
            .field("plan_deduplication", &self.plan_deduplication)
            .field("mail_default_sender", &self.mail_default_sender)
            .field("app_base_url", &self.app_base_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("smtp", &self.smtp)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if SECRET_KEY is missing in a release build or is too short.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("SECRET_KEY not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("SECRET_KEY environment variable must be set in production");
            }
        });

        if secret_key.len() < MIN_SECRET_KEY_LENGTH {
            panic!(
                "SECRET_KEY must be at least {} characters long",
                MIN_SECRET_KEY_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            secret_key,
            security_password_salt: env::var("SECURITY_PASSWORD_SALT")
                .unwrap_or_else(|_| DEFAULT_SECURITY_PASSWORD_SALT.to_string()),
            email_token_expiration_secs: parse_env(
                "EMAIL_TOKEN_EXPIRATION",
                DEFAULT_EMAIL_TOKEN_EXPIRATION_SECS,
            ),
            password_length: parse_env("PASSWORD_LENGTH", DEFAULT_PASSWORD_LENGTH),
            max_insured_amount: parse_env("MAX_INSURED_AMOUNT", DEFAULT_MAX_INSURED_AMOUNT),
            max_name_spaces: parse_env("MAX_NAME_SPACES", DEFAULT_MAX_NAME_SPACES),
            plan_deduplication: env::var("PLAN_DEDUPLICATION")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            mail_default_sender: env::var("MAIL_DEFAULT_SENDER")
                .unwrap_or_else(|_| DEFAULT_MAIL_SENDER.to_string()),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_APP_BASE_URL.to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_env("SERVER_PORT", DEFAULT_SERVER_PORT),
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").ok(),
                port: parse_env("SMTP_PORT", DEFAULT_SMTP_PORT),
                username: env::var("SMTP_USER").ok(),
                password: env::var("SMTP_PASS").ok(),
            },
        }
    }

    /// Build a configuration with defaults and an explicit secret.
    ///
    /// Used by tests and embedders that do not read the environment.
    pub fn with_secret(secret_key: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            secret_key: secret_key.into(),
            security_password_salt: DEFAULT_SECURITY_PASSWORD_SALT.to_string(),
            email_token_expiration_secs: DEFAULT_EMAIL_TOKEN_EXPIRATION_SECS,
            password_length: DEFAULT_PASSWORD_LENGTH,
            max_insured_amount: DEFAULT_MAX_INSURED_AMOUNT,
            max_name_spaces: DEFAULT_MAX_NAME_SPACES,
            plan_deduplication: true,
            mail_default_sender: DEFAULT_MAIL_SENDER.to_string(),
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            smtp: SmtpConfig {
                port: DEFAULT_SMTP_PORT,
                ..SmtpConfig::default()
            },
        }
    }

    /// Get secret bytes for confirmation token signing/verification.
    pub fn secret_key_bytes(&self) -> &[u8] {
        self.secret_key.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Parse an environment variable, falling back to `default` when unset or malformed.
fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
