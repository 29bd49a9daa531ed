//! Patient-facing plan views, where the expiration deriver feeds the UI.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Local;
use nutriplan_plan::{render_alert, render_badge, DisplayContext, PlanSummary};
use serde_json::json;

use crate::error::AppError;
use crate::queries::{allowed_item, plan};
use crate::routes::admin::allowed_items::AllowedItemResponse;
use crate::routes::admin::plans::PlanResponse;
use crate::routes::AppState;

/// GET /me/plans
///
/// The badge and the list-context alert are derived from the full plan set;
/// "today" is sampled once here so the deriver itself stays clock-free.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<crate::middleware::Auth>,
) -> Result<impl IntoResponse, AppError> {
    let rows = plan::list_plans_for_patient(&state.pool, &auth.account_id).await?;
    let summaries: Vec<PlanSummary> = rows.iter().map(|r| r.summary()).collect();

    let today = Local::now().date_naive();
    let badge = render_badge(&summaries, today);
    let alert = render_alert(
        &summaries,
        DisplayContext::List,
        today,
        state.config.billing.plan_price,
    );

    let plans: Vec<PlanResponse> = rows.into_iter().map(Into::into).collect();

    Ok(Json(json!({
        "plans": plans,
        "badge": badge,
        "alert": alert,
    })))
}

/// GET /me/plans/{id}
pub async fn detail(
    State(state): State<AppState>,
    Extension(auth): Extension<crate::middleware::Auth>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = plan::get_plan(&state.pool, &id)
        .await?
        .filter(|p| p.patient_id == auth.account_id)
        .ok_or(AppError::NotFound("Meal plan"))?;

    let items = allowed_item::list_items_for_plan(&state.pool, &id).await?;
    let items: Vec<AllowedItemResponse> = items.into_iter().map(Into::into).collect();

    // The detail alert still considers every plan of the patient: a second
    // active plan suppresses the nudge even on the expired plan's page.
    let all = plan::list_plans_for_patient(&state.pool, &auth.account_id).await?;
    let summaries: Vec<PlanSummary> = all.iter().map(|r| r.summary()).collect();

    let alert = render_alert(
        &summaries,
        DisplayContext::Detail,
        Local::now().date_naive(),
        state.config.billing.plan_price,
    );

    Ok(Json(json!({
        "plan": PlanResponse::from(row),
        "allowed_items": items,
        "alert": alert,
    })))
}
