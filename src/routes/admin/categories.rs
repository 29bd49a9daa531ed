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
use crate::queries::category::{self, CategoryRow};
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
}

impl From<CategoryRow> for CategoryResponse {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            sort_order: row.sort_order,
        }
    }
}

/// GET /admin/categories
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = category::list_categories(&state.pool).await?;
    let categories: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "categories": categories })))
}

#[derive(Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[serde(default)]
    pub sort_order: i64,
}

/// POST /admin/categories
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    if category::list_categories(&state.pool)
        .await?
        .iter()
        .any(|c| c.name.eq_ignore_ascii_case(&input.name))
    {
        return Err(AppError::Conflict(
            "A category with this name already exists".to_string(),
        ));
    }

    let id = Ulid::new().to_string();
    category::insert_category(&state.pool, &id, &input.name, input.sort_order).await?;

    let created = category::get_category(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(created))))
}

/// PUT /admin/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    category::get_category(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    category::update_category(&state.pool, &id, &input.name, input.sort_order).await?;

    let updated = category::get_category(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    Ok(Json(CategoryResponse::from(updated)))
}

/// DELETE /admin/categories/{id}
///
/// Refused while recipes or allowed items still reference the category.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    category::get_category(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    if category::category_in_use(&state.pool, &id).await? {
        return Err(AppError::Conflict(
            "Category is referenced by recipes or allowed items".to_string(),
        ));
    }

    category::delete_category(&state.pool, &id).await?;

    Ok(Json(json!({"status": "deleted"})))
}
