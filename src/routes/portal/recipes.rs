use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::queries::recipe;
use crate::routes::admin::recipes::RecipeResponse;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct RecipeListQuery {
    pub category_id: Option<String>,
}

/// GET /me/recipes - Recipe catalogue, optionally filtered by meal category.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let recipes = recipe::list_recipes(&state.pool, query.category_id.as_deref()).await?;
    let recipes: Vec<RecipeResponse> = recipes.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "recipes": recipes })))
}
