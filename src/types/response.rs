use serde::Serialize;
use utoipa::ToSchema;

/// Outcome body shared by error responses and the verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Outcome kind, e.g. `VALIDATION-ERROR` or `Success`
    #[schema(example = "Success")]
    pub status: String,
    /// Human readable explanation
    #[schema(example = "Thanks for the registration.")]
    pub reason: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            reason: reason.into(),
        }
    }
}
