pub mod ingredients;
pub mod public;
pub mod recipes;
pub mod shopping_list;
pub mod subscriptions;
pub mod tags;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure a handler bubbles up with `?`. The four core error kinds map
/// onto client-visible statuses unmodified; storage failures collapse to a
/// generic 500 after being logged.
#[derive(Debug)]
pub enum ApiError {
    Core(potluck_core::Error),
    Database(diesel::result::Error),
    Pool,
    Internal(&'static str),
}

impl From<potluck_core::Error> for ApiError {
    fn from(err: potluck_core::Error) -> Self {
        ApiError::Core(err)
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Core(err) => {
                let status = match &err {
                    potluck_core::Error::Validation(_) => StatusCode::BAD_REQUEST,
                    potluck_core::Error::Permission(_) => StatusCode::FORBIDDEN,
                    potluck_core::Error::Conflict(_) => StatusCode::CONFLICT,
                    potluck_core::Error::NotFound(_) => StatusCode::NOT_FOUND,
                };
                (status, err.to_string())
            }
            ApiError::Database(err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Pool => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database connection failed".to_string(),
            ),
            ApiError::Internal(context) => {
                tracing::error!("internal error: {context}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(components(schemas(ErrorResponse)))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Add security scheme
    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        tags::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        shopping_list::ApiDoc::openapi(),
        subscriptions::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
