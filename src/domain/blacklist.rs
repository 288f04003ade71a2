//! Blacklisted email addresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An email address barred from registration until removed out-of-band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub id: Uuid,
    pub email_address: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
