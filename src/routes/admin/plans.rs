use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use nutriplan_plan::PlanStatus;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use ulid::Ulid;
use validator::Validate;

use super::patients::validate_date_opt;
use crate::error::AppError;
use crate::queries::plan::{self, MealPlanRow};
use crate::queries::{allowed_item, patient};
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub patient_id: String,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub due_date_new_meal_plan: Option<String>,
    pub payment_url_new_meal_plan: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<MealPlanRow> for PlanResponse {
    fn from(row: MealPlanRow) -> Self {
        Self {
            id: row.id,
            patient_id: row.patient_id,
            title: row.title,
            start_date: row.start_date,
            end_date: row.end_date,
            due_date_new_meal_plan: row.due_date_new_meal_plan,
            payment_url_new_meal_plan: row.payment_url_new_meal_plan,
            status: row.status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// GET /admin/patients/{id}/plans
pub async fn list_for_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    patient::get_patient(&state.pool, &patient_id)
        .await?
        .ok_or(AppError::NotFound("Patient"))?;

    let plans = plan::list_plans_for_patient(&state.pool, &patient_id).await?;
    let plans: Vec<PlanResponse> = plans.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "plans": plans })))
}

#[derive(Deserialize, Validate)]
pub struct PlanInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub due_date_new_meal_plan: Option<String>,
    #[validate(url)]
    pub payment_url_new_meal_plan: Option<String>,
    #[serde(default = "default_status")]
    pub status: PlanStatus,
    pub notes: Option<String>,
}

fn default_status() -> PlanStatus {
    PlanStatus::Active
}

impl PlanInput {
    fn validate_dates(&self) -> Result<(), AppError> {
        validate_date_opt("start_date", self.start_date.as_deref())?;
        validate_date_opt("end_date", self.end_date.as_deref())?;
        validate_date_opt(
            "due_date_new_meal_plan",
            self.due_date_new_meal_plan.as_deref(),
        )?;
        Ok(())
    }
}

/// POST /admin/patients/{id}/plans
pub async fn create(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Json(input): Json<PlanInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    input.validate_dates()?;

    patient::get_patient(&state.pool, &patient_id)
        .await?
        .ok_or(AppError::NotFound("Patient"))?;

    let id = Ulid::new().to_string();
    plan::insert_plan(
        &state.pool,
        &id,
        &patient_id,
        &input.title,
        input.start_date.as_deref(),
        input.end_date.as_deref(),
        input.due_date_new_meal_plan.as_deref(),
        input.payment_url_new_meal_plan.as_deref(),
        input.status,
        input.notes.as_deref(),
    )
    .await?;

    info!(plan_id = %id, patient_id = %patient_id, "Meal plan created");

    let created = plan::get_plan(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;

    Ok((StatusCode::CREATED, Json(PlanResponse::from(created))))
}

/// GET /admin/plans/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = plan::get_plan(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;

    let items = allowed_item::list_items_for_plan(&state.pool, &id).await?;
    let items: Vec<super::allowed_items::AllowedItemResponse> =
        items.into_iter().map(Into::into).collect();

    Ok(Json(json!({
        "plan": PlanResponse::from(row),
        "allowed_items": items,
    })))
}

/// PUT /admin/plans/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PlanInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    input.validate_dates()?;

    plan::get_plan(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;

    plan::update_plan(
        &state.pool,
        &id,
        &input.title,
        input.start_date.as_deref(),
        input.end_date.as_deref(),
        input.due_date_new_meal_plan.as_deref(),
        input.payment_url_new_meal_plan.as_deref(),
        input.status,
        input.notes.as_deref(),
    )
    .await?;

    let updated = plan::get_plan(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;

    Ok(Json(PlanResponse::from(updated)))
}

/// DELETE /admin/plans/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !plan::delete_plan(&state.pool, &id).await? {
        return Err(AppError::NotFound("Meal plan"));
    }

    info!(plan_id = %id, "Meal plan deleted");
    Ok(Json(json!({"status": "deleted"})))
}
