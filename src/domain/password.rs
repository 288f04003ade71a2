//! Password value object and credential generation.
//!
//! Customers never choose their initial password: one is generated at
//! sign-up, mailed to them, and only its Argon2 hash is stored.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::errors::{AppError, AppResult};

/// Character universe for generated passwords: lowercase, uppercase, digits, punctuation.
pub const PASSWORD_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Errors raised while generating credentials.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Password length must be positive")]
    ZeroLength,

    #[error("Password length {requested} exceeds the {available} available distinct characters")]
    LengthExceedsAlphabet { requested: usize, available: usize },
}

/// Random password generator sampling without replacement.
#[derive(Debug, Clone, Copy)]
pub struct PasswordGenerator {
    length: usize,
}

impl PasswordGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Generate a password of exactly `length` distinct characters in random order.
    ///
    /// # Errors
    /// Fails when `length` is zero or larger than [`PASSWORD_ALPHABET`].
    pub fn generate(&self) -> Result<String, CredentialError> {
        if self.length == 0 {
            return Err(CredentialError::ZeroLength);
        }
        if self.length > PASSWORD_ALPHABET.len() {
            return Err(CredentialError::LengthExceedsAlphabet {
                requested: self.length,
                available: PASSWORD_ALPHABET.len(),
            });
        }

        let mut rng = OsRng;
        let password = PASSWORD_ALPHABET
            .choose_multiple(&mut rng, self.length)
            .map(|&b| b as char)
            .collect();

        Ok(password)
    }
}

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns validation error for an empty password, internal error if hashing fails.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.is_empty() {
            return Err(AppError::validation("Password must not be empty"));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}
