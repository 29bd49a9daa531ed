use axum::{extract::State, response::IntoResponse, Extension, Json};
use nutriplan_user::{hash_password, verify_password};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::Auth;
use crate::queries::patient;
use crate::routes::AppState;

/// GET /me - The logged-in patient's own profile.
pub async fn show(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
) -> Result<impl IntoResponse, AppError> {
    let account = patient::get_patient(&state.pool, &auth.account_id)
        .await?
        .ok_or(AppError::NotFound("Account"))?;

    Ok(Json(json!({
        "id": account.id,
        "name": account.name,
        "email": account.email,
        "phone": account.phone,
        "birth_date": account.birth_date,
        "created_at": account.created_at,
    })))
}

#[derive(Deserialize, Validate)]
pub struct UpdateSettingsInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub current_password: Option<String>,
    #[validate(length(min = 8))]
    pub new_password: Option<String>,
}

/// PUT /me/settings - Patients update their own data (the "update your
/// data" half of the renewal nudge lands here).
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<UpdateSettingsInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    crate::routes::admin::patients::validate_date_opt("birth_date", input.birth_date.as_deref())?;

    let account = patient::get_patient(&state.pool, &auth.account_id)
        .await?
        .ok_or(AppError::NotFound("Account"))?;

    if let Some(existing) = patient::get_patient_by_email(&state.pool, &input.email).await? {
        if existing.id != account.id {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }
    }

    if let Some(new_password) = &input.new_password {
        let current = input.current_password.as_deref().ok_or_else(|| {
            AppError::ValidationError(
                "current_password is required to change the password".to_string(),
            )
        })?;

        if !verify_password(current, &account.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = hash_password(new_password)?;
        patient::update_patient_password(&state.pool, &account.id, &password_hash).await?;
        info!(patient_id = %account.id, "Patient password changed");
    }

    patient::update_patient(
        &state.pool,
        &account.id,
        &input.name,
        &input.email,
        input.phone.as_deref(),
        input.birth_date.as_deref(),
        account.notes.as_deref(),
    )
    .await?;

    Ok(Json(json!({"status": "ok"})))
}
