use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use ulid::Ulid;
use validator::Validate;

use crate::error::AppError;
use crate::queries::recipe::{self, RecipeRow};
use crate::queries::category;
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: String,
    pub category_id: String,
    pub category_name: String,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<RecipeRow> for RecipeResponse {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            category_name: row.category_name,
            title: row.title,
            description: row.description,
            instructions: row.instructions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct RecipeListQuery {
    pub category_id: Option<String>,
}

/// GET /admin/recipes
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let recipes = recipe::list_recipes(&state.pool, query.category_id.as_deref()).await?;
    let recipes: Vec<RecipeResponse> = recipes.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "recipes": recipes })))
}

#[derive(Deserialize, Validate)]
pub struct RecipeInput {
    #[validate(length(min = 1))]
    pub category_id: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub instructions: String,
}

/// POST /admin/recipes
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<RecipeInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    category::get_category(&state.pool, &input.category_id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    let id = Ulid::new().to_string();
    recipe::insert_recipe(
        &state.pool,
        &id,
        &input.category_id,
        &input.title,
        input.description.as_deref(),
        &input.instructions,
    )
    .await?;

    let created = recipe::get_recipe(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    Ok((StatusCode::CREATED, Json(RecipeResponse::from(created))))
}

/// GET /admin/recipes/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = recipe::get_recipe(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    Ok(Json(RecipeResponse::from(row)))
}

/// PUT /admin/recipes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RecipeInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    recipe::get_recipe(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;
    category::get_category(&state.pool, &input.category_id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    recipe::update_recipe(
        &state.pool,
        &id,
        &input.category_id,
        &input.title,
        input.description.as_deref(),
        &input.instructions,
    )
    .await?;

    let updated = recipe::get_recipe(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    Ok(Json(RecipeResponse::from(updated)))
}

/// DELETE /admin/recipes/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !recipe::delete_recipe(&state.pool, &id).await? {
        return Err(AppError::NotFound("Recipe"));
    }

    Ok(Json(json!({"status": "deleted"})))
}
