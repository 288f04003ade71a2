//! Customer aggregate: customer, activation profile and sign-up records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Customer domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub customer_name: String,
    pub email_address: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Activation state paired one-to-one with a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub activated: bool,
    pub updated_at: DateTime<Utc>,
}

/// Result of a profile activation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The profile went from inactive to active
    Activated,
    /// The profile was already active; nothing was written
    AlreadyActive,
}

/// Sign-up payload after it passed schema checks.
///
/// Field-level rules may still normalize values (e.g. the email address).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct SignUpRequest {
    /// Name of the customer, at most three space-separated parts
    #[schema(example = "Jane Doe")]
    pub customer_name: String,
    /// Email address of the customer
    #[schema(example = "jane@example.com")]
    pub email_address: String,
    /// Insurance plan category
    #[schema(example = "Family")]
    pub insurance_plan_name: String,
    /// Insured amount, integral
    #[schema(example = 300000)]
    pub insured_amount: i64,
}

/// Data the persistence layer needs to create a sign-up atomically
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub customer_name: String,
    pub email_address: String,
    pub password_hash: String,
    pub insurance_plan_name: String,
    pub insured_amount: i64,
}

/// Projection of a freshly created customer and insurance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Enrollment {
    #[serde(rename = "Customer Name")]
    #[schema(example = "Jane Doe")]
    pub customer_name: String,
    #[serde(rename = "Email Address")]
    #[schema(example = "jane@example.com")]
    pub email_address: String,
    #[serde(rename = "Insurance Plan")]
    #[schema(example = "Family")]
    pub insurance_plan: String,
    #[serde(rename = "Insurance Amount")]
    #[schema(example = 300000)]
    pub insurance_amount: i64,
}
