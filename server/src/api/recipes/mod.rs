pub mod create;
pub mod delete;
pub mod form;
pub mod get;
pub mod list;
pub mod photo;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use notebook_core::PhotoStatus;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/photo", get(photo::get_recipe_photo))
}

/// What happened to an uploaded photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhotoState {
    /// No photo was uploaded
    None,
    /// Photo was normalized and stored
    Attached,
    /// Photo couldn't be processed; the recipe was saved without it
    Rejected,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PhotoStatusResponse {
    pub state: PhotoState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<PhotoStatus> for PhotoStatusResponse {
    fn from(status: PhotoStatus) -> Self {
        match status {
            PhotoStatus::None => Self {
                state: PhotoState::None,
                error: None,
            },
            PhotoStatus::Attached => Self {
                state: PhotoState::Attached,
                error: None,
            },
            PhotoStatus::Rejected(error) => Self {
                state: PhotoState::Rejected,
                error: Some(error),
            },
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        photo::get_recipe_photo,
    ),
    components(schemas(
        PhotoState,
        PhotoStatusResponse,
        create::CreateRecipeRequest,
        create::CreateRecipeResponse,
        list::ListRecipesResponse,
        list::RecipeSummary,
        get::RecipeResponse,
        update::UpdateRecipeRequest,
        update::UpdateRecipeResponse,
    ))
)]
pub struct ApiDoc;
