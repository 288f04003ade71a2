//! Sign-up and email confirmation handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::extractors::RawSubmission;
use crate::api::AppState;
use crate::domain::Enrollment;
use crate::errors::AppResult;
use crate::types::StatusResponse;

/// Create sign-up routes
pub fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/confirm/:token", get(confirm))
}

/// Register a new customer
///
/// A password is generated and mailed together with a confirmation link.
#[utoipa::path(
    post,
    path = "/user/register",
    tag = "Sign-up",
    request_body(content = SignUpRequest, content_type = "application/json"),
    responses(
        (status = 201, description = "Customer registered, verification email queued", body = Enrollment),
        (status = 400, description = "Validation error", body = StatusResponse),
        (status = 409, description = "Email already registered", body = StatusResponse),
        (status = 422, description = "Email is blacklisted", body = StatusResponse),
        (status = 500, description = "Internal server error", body = StatusResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    RawSubmission(submission): RawSubmission,
) -> AppResult<(StatusCode, Json<Enrollment>)> {
    let enrollment = state.registration_service.register(submission).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Confirm an email address
#[utoipa::path(
    get,
    path = "/user/confirm/{token}",
    tag = "Sign-up",
    params(("token" = String, Path, description = "Confirmation token from the verification email")),
    responses(
        (status = 200, description = "Activated, or already activated", body = StatusResponse),
        (status = 404, description = "Token invalid or expired, or customer unknown", body = StatusResponse),
        (status = 500, description = "Internal server error", body = StatusResponse)
    )
)]
pub async fn confirm(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    let outcome = state.verification_service.confirm(&token).await?;
    Ok(Json(StatusResponse::from(outcome)))
}
