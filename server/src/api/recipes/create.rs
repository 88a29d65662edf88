use crate::api::recipes::form::read_form;
use crate::api::recipes::PhotoStatusResponse;
use crate::api::{notebook_error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use notebook_core::{save_recipe, RecipeForm};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreateRecipeRequest {
    pub name: String,
    /// One of savory, sweet, beverage, healthy (default: savory)
    pub category: Option<String>,
    /// Free text, e.g. "40 min"
    pub prep_time: Option<String>,
    pub ingredients: Option<String>,
    /// Preparation instructions
    pub body: String,
    /// JPEG, PNG, GIF or WebP. An unreadable photo doesn't block the save.
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: i64,
    pub photo: PhotoStatusResponse,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = CreateRecipeRequest),
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 413, description = "Request body over the upload limit; nothing is saved", body = ErrorResponse),
        (status = 500, description = "Recipe store failure", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let category = match form.category() {
        Ok(category) => category.unwrap_or_default(),
        Err(response) => return response,
    };

    let recipe_form = RecipeForm {
        name: form.field("name").unwrap_or_default().to_string(),
        category,
        prep_time: form.field("prep_time").unwrap_or_default().trim().to_string(),
        ingredients: form.non_blank("ingredients").map(str::to_string),
        body: form.field("body").unwrap_or_default().to_string(),
        photo: form.photo,
    };

    match save_recipe(state.store.as_ref(), &state.photo_settings, recipe_form) {
        Ok(saved) => (
            StatusCode::CREATED,
            Json(CreateRecipeResponse {
                id: saved.id.0,
                photo: saved.photo.into(),
            }),
        )
            .into_response(),
        Err(e) => notebook_error_response(e),
    }
}
