pub mod categories;
pub mod recipes;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use notebook_core::{NotebookError, MAX_FILE_SIZE};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::AppState;

/// Room for the text fields on top of the largest accepted photo. Bigger
/// requests are refused with 413 before any field is read, so an oversized
/// photo fails the whole save rather than being dropped.
const MAX_REQUEST_SIZE: usize = MAX_FILE_SIZE + 1024 * 1024;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Map a notebook failure onto an HTTP response. Store failures are logged
/// and surfaced as 500s.
pub fn notebook_error_response(err: NotebookError) -> Response {
    match err {
        NotebookError::Validation(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        NotebookError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        NotebookError::Store(e) => {
            tracing::error!("Recipe store failure: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to access recipe store",
            )
        }
    }
}

/// All API routes, with state applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/recipes", recipes::router())
        .nest("/api/categories", categories::router())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_SIZE))
        .with_state(state)
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Recipe Notebook", description = "Recipe notebook API"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        recipes::ApiDoc::openapi(),
        categories::ApiDoc::openapi(),
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
