use crate::api::{error_response, notebook_error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use notebook_core::{denormalize, validate_image, PhotoUnavailable, RecipeId};

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/photo",
    tag = "recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Normalized JPEG photo", content_type = "image/jpeg"),
        (status = 404, description = "Recipe or photo not found", body = ErrorResponse),
        (status = 500, description = "Recipe store failure", body = ErrorResponse)
    )
)]
pub async fn get_recipe_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let recipe = match state.store.get(RecipeId(id)) {
        Ok(Some(recipe)) => recipe,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => return notebook_error_response(e.into()),
    };

    // Stored text must decode to an image we'd have accepted in the first place
    let photo = denormalize(recipe.photo.as_ref()).and_then(|bytes| {
        validate_image(&bytes)
            .map(|content_type| (content_type, bytes))
            .map_err(|e| PhotoUnavailable::Corrupt(e.to_string()))
    });

    match photo {
        Ok((content_type, bytes)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, "private, max-age=3600".to_string()),
            ],
            bytes,
        )
            .into_response(),
        Err(PhotoUnavailable::NoPhoto) => {
            error_response(StatusCode::NOT_FOUND, "Recipe has no photo")
        }
        Err(e @ PhotoUnavailable::Corrupt(_)) => {
            tracing::warn!(recipe_id = id, error = %e, "Unable to serve stored photo");
            error_response(StatusCode::NOT_FOUND, "Photo not available")
        }
    }
}
