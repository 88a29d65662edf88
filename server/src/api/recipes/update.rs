use crate::api::recipes::form::read_form;
use crate::api::recipes::PhotoStatusResponse;
use crate::api::{notebook_error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use notebook_core::{edit_recipe, RecipeEdit, RecipeId};
use serde::Serialize;
use utoipa::ToSchema;

/// Every field is optional; fields that aren't submitted keep their stored value.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub prep_time: Option<String>,
    /// Submit an empty value to clear the ingredients
    pub ingredients: Option<String>,
    pub body: Option<String>,
    /// Replacement photo. Omit it to keep the current one.
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
    /// "true" drops the stored photo when no replacement is uploaded
    pub remove_photo: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateRecipeResponse {
    pub photo: PhotoStatusResponse,
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    request_body(content_type = "multipart/form-data", content = UpdateRecipeRequest),
    responses(
        (status = 200, description = "Recipe updated", body = UpdateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 413, description = "Request body over the upload limit; nothing is saved", body = ErrorResponse),
        (status = 500, description = "Recipe store failure", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> impl IntoResponse {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let category = match form.category() {
        Ok(category) => category,
        Err(response) => return response,
    };

    let edit = RecipeEdit {
        name: form.field("name").map(str::to_string),
        category,
        prep_time: form.field("prep_time").map(|p| p.trim().to_string()),
        ingredients: form
            .field("ingredients")
            .map(|i| (!i.trim().is_empty()).then(|| i.to_string())),
        body: form.field("body").map(str::to_string),
        remove_photo: form.flag("remove_photo"),
        photo: form.photo,
    };

    match edit_recipe(
        state.store.as_ref(),
        &state.photo_settings,
        RecipeId(id),
        edit,
    ) {
        Ok(status) => (
            StatusCode::OK,
            Json(UpdateRecipeResponse {
                photo: status.into(),
            }),
        )
            .into_response(),
        Err(e) => notebook_error_response(e),
    }
}
