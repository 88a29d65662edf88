use axum::routing::get;
use axum::{Json, Router};
use notebook_core::Category;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoriesResponse {
    /// Category names accepted by the recipe forms, in display order
    pub categories: Vec<String>,
}

/// Returns the router for /api/categories endpoints (mounted at /api/categories)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Recipe categories", body = CategoriesResponse)
    )
)]
pub async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: Category::ALL.iter().map(|c| c.as_str().to_string()).collect(),
    })
}

#[derive(OpenApi)]
#[openapi(paths(list_categories), components(schemas(CategoriesResponse)))]
pub struct ApiDoc;
