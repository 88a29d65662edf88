use crate::api::{error_response, notebook_error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use notebook_core::{remove_recipe, Mutation, RecipeId};

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 500, description = "Recipe store failure", body = ErrorResponse)
    )
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match remove_recipe(state.store.as_ref(), RecipeId(id)) {
        Ok(Mutation::Applied) => StatusCode::NO_CONTENT.into_response(),
        Ok(Mutation::NotFound) => error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => notebook_error_response(e),
    }
}
