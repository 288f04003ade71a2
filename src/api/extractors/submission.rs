//! Raw submission extractor - Captures the declared content type and body.
//!
//! The body is not parsed here; content-type and JSON checks belong to the
//! validation pipeline so they report in its order and wording.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};

use crate::errors::AppError;
use crate::services::Submission;

pub struct RawSubmission(pub Submission);

#[async_trait]
impl<S> FromRequest<S> for RawSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        Ok(RawSubmission(Submission {
            content_type,
            body: body.to_vec(),
        }))
    }
}
