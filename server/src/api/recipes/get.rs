use crate::api::{error_response, notebook_error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use notebook_core::{Recipe, RecipeId};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub prep_time: String,
    pub ingredients: Option<String>,
    /// Preparation instructions
    pub body: String,
    /// Fetch the image from /api/recipes/{id}/photo
    pub has_photo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id.0,
            name: recipe.name,
            category: recipe.category.as_str().to_string(),
            prep_time: recipe.prep_time,
            ingredients: recipe.ingredients,
            body: recipe.body,
            has_photo: recipe.photo.is_some(),
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 500, description = "Recipe store failure", body = ErrorResponse)
    )
)]
pub async fn get_recipe(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.store.get(RecipeId(id)) {
        Ok(Some(recipe)) => (StatusCode::OK, Json(RecipeResponse::from(recipe))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => notebook_error_response(e.into()),
    }
}
