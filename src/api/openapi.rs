//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::registration_handler;
use crate::domain::{Enrollment, SignUpRequest};
use crate::types::StatusResponse;

/// OpenAPI documentation for the insurance sign-up API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Insurance Sign-up",
        version = "0.1.0",
        description = "Customer sign-up with generated credentials and email confirmation",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        registration_handler::register,
        registration_handler::confirm,
    ),
    components(
        schemas(SignUpRequest, Enrollment, StatusResponse)
    ),
    tags(
        (name = "Sign-up", description = "Customer registration and email verification")
    )
)]
pub struct ApiDoc;
