//! Confirmation token service.
//!
//! Tokens are HS256 JWTs carrying the email, the issuance time and a purpose
//! string. The signing key mixes the server secret with the purpose salt, so
//! tokens minted for another purpose under the same secret never verify.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::errors::AppError;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmationClaims {
    pub email: String,
    pub iat: i64,
    pub purpose: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Confirmation token is invalid")]
    Invalid,

    #[error("Confirmation token has expired")]
    Expired,

    #[error("Failed to sign confirmation token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid | TokenError::Expired => AppError::TokenInvalidOrExpired,
            TokenError::Signing(msg) => AppError::Internal(msg),
        }
    }
}

/// Issues and verifies email confirmation tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    purpose: String,
    max_age_secs: i64,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        let mut key = config.secret_key_bytes().to_vec();
        key.push(b'.');
        key.extend_from_slice(config.security_password_salt.as_bytes());

        Self {
            encoding_key: EncodingKey::from_secret(&key),
            decoding_key: DecodingKey::from_secret(&key),
            purpose: config.security_password_salt.clone(),
            max_age_secs: config.email_token_expiration_secs,
        }
    }

    /// Issue a token for `email` stamped with the current time.
    pub fn issue(&self, email: &str) -> Result<String, TokenError> {
        self.issue_at(email, Utc::now())
    }

    pub fn issue_at(&self, email: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = ConfirmationClaims {
            email: email.to_string(),
            iat: now.timestamp(),
            purpose: self.purpose.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return the embedded email.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`.
    ///
    /// A token exactly `max_age` seconds old is still accepted.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = decode::<ConfirmationClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| {
                tracing::debug!(error = %e, "Confirmation token rejected");
                TokenError::Invalid
            })?
            .claims;

        if claims.purpose != self.purpose {
            return Err(TokenError::Invalid);
        }

        if now.timestamp() - claims.iat > self.max_age_secs {
            return Err(TokenError::Expired);
        }

        Ok(claims.email)
    }

    // Age is checked against `iat` by hand, so no registered claim is required.
    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();
        validation
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn config() -> Config {
        Config::with_secret("test-secret-key-that-is-long-enough")
    }

    #[test]
    fn test_round_trip_returns_email() {
        let tokens = TokenService::new(&config());
        let token = tokens.issue("jane@example.com").unwrap();

        assert_eq!(tokens.verify(&token).unwrap(), "jane@example.com");
    }

    #[test]
    fn test_expiry_boundary() {
        let tokens = TokenService::new(&config());
        let issued = Utc::now();
        let token = tokens.issue_at("jane@example.com", issued).unwrap();

        assert!(tokens.verify_at(&token, issued + Duration::seconds(180)).is_ok());
        assert_eq!(
            tokens.verify_at(&token, issued + Duration::seconds(181)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let tokens = TokenService::new(&config());
        let token = tokens.issue("jane@example.com").unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = {
            let other = tokens.issue("mallory@example.com").unwrap();
            other.split('.').nth(1).unwrap().to_string()
        };
        parts[1] = &forged_payload;
        let forged = parts.join(".");

        assert_eq!(tokens.verify(&forged), Err(TokenError::Invalid));
        assert_eq!(tokens.verify("not-a-token"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_other_salt_or_secret_is_invalid() {
        let tokens = TokenService::new(&config());

        let mut salted = config();
        salted.security_password_salt = "password-reset".into();
        let reset_token = TokenService::new(&salted).issue("jane@example.com").unwrap();
        assert_eq!(tokens.verify(&reset_token), Err(TokenError::Invalid));

        let other_secret = Config::with_secret("another-secret-key-that-is-long-enough");
        let foreign = TokenService::new(&other_secret).issue("jane@example.com").unwrap();
        assert_eq!(tokens.verify(&foreign), Err(TokenError::Invalid));
    }

    #[test]
    fn test_errors_map_to_verification_expired() {
        assert_eq!(AppError::from(TokenError::Expired).kind(), "VERIFICATION-EXPIRED");
        assert_eq!(AppError::from(TokenError::Invalid).kind(), "VERIFICATION-EXPIRED");
        assert!(AppError::from(TokenError::Signing("x".into())).is_internal());
    }
}
