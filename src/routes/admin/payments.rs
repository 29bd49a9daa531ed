use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::{Display, EnumString};
use tracing::info;
use ulid::Ulid;
use validator::Validate;

use crate::error::AppError;
use crate::queries::payment::{self, PaymentRow};
use crate::queries::plan;
use crate::routes::AppState;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub meal_plan_id: String,
    pub amount: f64,
    pub status: String,
    pub external_url: Option<String>,
    pub paid_at: Option<i64>,
    pub created_at: i64,
}

impl From<PaymentRow> for PaymentResponse {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            meal_plan_id: row.meal_plan_id,
            amount: row.amount,
            status: row.status,
            external_url: row.external_url,
            paid_at: row.paid_at,
            created_at: row.created_at,
        }
    }
}

/// GET /admin/plans/{id}/payments
pub async fn list(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    plan::get_plan(&state.pool, &plan_id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;

    let payments = payment::list_payments_for_plan(&state.pool, &plan_id).await?;
    let payments: Vec<PaymentResponse> = payments.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "payments": payments })))
}

#[derive(Deserialize, Validate)]
pub struct CreatePaymentInput {
    #[validate(range(min = 0.01))]
    pub amount: f64,
    #[validate(url)]
    pub external_url: Option<String>,
}

/// POST /admin/plans/{id}/payments
pub async fn create(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
    Json(input): Json<CreatePaymentInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    plan::get_plan(&state.pool, &plan_id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;

    let id = Ulid::new().to_string();
    payment::insert_payment(
        &state.pool,
        &id,
        &plan_id,
        input.amount,
        input.external_url.as_deref(),
    )
    .await?;

    info!(payment_id = %id, plan_id = %plan_id, "Payment recorded");

    let created = payment::get_payment(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Payment"))?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(created))))
}

#[derive(Deserialize, Validate)]
pub struct UpdatePaymentInput {
    pub status: PaymentStatus,
    #[validate(url)]
    pub external_url: Option<String>,
}

/// PUT /admin/payments/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePaymentInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    payment::get_payment(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Payment"))?;

    payment::update_payment_status(
        &state.pool,
        &id,
        &input.status.to_string(),
        input.external_url.as_deref(),
    )
    .await?;

    let updated = payment::get_payment(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Payment"))?;

    Ok(Json(PaymentResponse::from(updated)))
}
