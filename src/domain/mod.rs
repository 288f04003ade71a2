//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod blacklist;
pub mod customer;
pub mod password;

pub use blacklist::BlacklistEntry;
pub use customer::{Activation, Customer, Enrollment, NewEnrollment, Profile, SignUpRequest};
pub use password::{CredentialError, Password, PasswordGenerator, PASSWORD_ALPHABET};
