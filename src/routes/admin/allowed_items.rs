use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use ulid::Ulid;
use validator::Validate;

use crate::error::AppError;
use crate::queries::allowed_item::{self, AllowedItemRow};
use crate::queries::{category, plan};
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct AllowedItemResponse {
    pub id: String,
    pub meal_plan_id: String,
    pub category_id: String,
    pub category_name: String,
    pub description: String,
    pub quantity: Option<String>,
}

impl From<AllowedItemRow> for AllowedItemResponse {
    fn from(row: AllowedItemRow) -> Self {
        Self {
            id: row.id,
            meal_plan_id: row.meal_plan_id,
            category_id: row.category_id,
            category_name: row.category_name,
            description: row.description,
            quantity: row.quantity,
        }
    }
}

/// GET /admin/plans/{id}/allowed-items
pub async fn list(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    plan::get_plan(&state.pool, &plan_id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;

    let items = allowed_item::list_items_for_plan(&state.pool, &plan_id).await?;
    let items: Vec<AllowedItemResponse> = items.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "allowed_items": items })))
}

#[derive(Deserialize, Validate)]
pub struct AllowedItemInput {
    #[validate(length(min = 1))]
    pub category_id: String,
    #[validate(length(min = 1, max = 300))]
    pub description: String,
    pub quantity: Option<String>,
}

/// POST /admin/plans/{id}/allowed-items
pub async fn create(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
    Json(input): Json<AllowedItemInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    plan::get_plan(&state.pool, &plan_id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;
    category::get_category(&state.pool, &input.category_id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    let id = Ulid::new().to_string();
    allowed_item::insert_item(
        &state.pool,
        &id,
        &plan_id,
        &input.category_id,
        &input.description,
        input.quantity.as_deref(),
    )
    .await?;

    let created = allowed_item::get_item(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Allowed item"))?;

    Ok((StatusCode::CREATED, Json(AllowedItemResponse::from(created))))
}

/// PUT /admin/allowed-items/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AllowedItemInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    allowed_item::get_item(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Allowed item"))?;
    category::get_category(&state.pool, &input.category_id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    allowed_item::update_item(
        &state.pool,
        &id,
        &input.category_id,
        &input.description,
        input.quantity.as_deref(),
    )
    .await?;

    let updated = allowed_item::get_item(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Allowed item"))?;

    Ok(Json(AllowedItemResponse::from(updated)))
}

/// DELETE /admin/allowed-items/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !allowed_item::delete_item(&state.pool, &id).await? {
        return Err(AppError::NotFound("Allowed item"));
    }

    Ok(Json(json!({"status": "deleted"})))
}
