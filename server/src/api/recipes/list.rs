use crate::api::{notebook_error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use notebook_core::{search_recipes, Recipe};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Case-insensitive text matched against recipe names and instructions
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub prep_time: String,
    pub has_photo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.0,
            name: recipe.name.clone(),
            category: recipe.category.as_str().to_string(),
            prep_time: recipe.prep_time.clone(),
            has_photo: recipe.photo.is_some(),
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes in creation order", body = ListRecipesResponse),
        (status = 500, description = "Recipe store failure", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let query = params.q.unwrap_or_default();

    match search_recipes(state.store.as_ref(), &query) {
        Ok(recipes) => (
            StatusCode::OK,
            Json(ListRecipesResponse {
                recipes: recipes.iter().map(RecipeSummary::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => notebook_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, body_json, create, empty_request, png, send};

    #[tokio::test]
    async fn test_list_empty() {
        let app = app();
        let response = send(&app, empty_request("GET", "/api/recipes")).await;
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(response).await["recipes"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_list_in_creation_order() {
        let app = app();
        let photo = png(10, 10);
        create(&app, &[("name", "Cake"), ("category", "sweet"), ("body", "Bake")], Some(&photo)).await;
        create(&app, &[("name", "Lemonade"), ("category", "beverage"), ("body", "Squeeze")], None).await;

        let json = body_json(send(&app, empty_request("GET", "/api/recipes")).await).await;
        let recipes = json["recipes"].as_array().unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0]["name"], "Cake");
        assert_eq!(recipes[0]["category"], "sweet");
        assert_eq!(recipes[0]["has_photo"], true);
        assert_eq!(recipes[1]["name"], "Lemonade");
        assert_eq!(recipes[1]["has_photo"], false);
    }

    #[tokio::test]
    async fn test_search_by_name_and_body() {
        let app = app();
        create(&app, &[("name", "Chocolate Cake"), ("body", "Bake it")], None).await;
        create(&app, &[("name", "Soup"), ("body", "Add CHOCOLATE? never")], None).await;
        create(&app, &[("name", "Tea"), ("body", "Steep")], None).await;

        let json = body_json(send(&app, empty_request("GET", "/api/recipes?q=chocolate")).await).await;
        let names: Vec<&str> = json["recipes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Chocolate Cake", "Soup"]);
    }
}
