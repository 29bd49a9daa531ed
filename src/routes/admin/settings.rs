use axum::{extract::State, response::IntoResponse, Extension, Json};
use nutriplan_user::{hash_password, verify_password};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::Auth;
use crate::queries::admin;
use crate::routes::AppState;

/// GET /admin/settings - The logged-in nutritionist's own profile.
pub async fn show(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
) -> Result<impl IntoResponse, AppError> {
    let account = admin::get_admin(&state.pool, &auth.account_id)
        .await?
        .ok_or(AppError::NotFound("Account"))?;

    Ok(Json(json!({
        "id": account.id,
        "name": account.name,
        "email": account.email,
        "created_at": account.created_at,
    })))
}

#[derive(Deserialize, Validate)]
pub struct UpdateSettingsInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Required when `new_password` is set.
    pub current_password: Option<String>,
    #[validate(length(min = 8))]
    pub new_password: Option<String>,
}

/// PUT /admin/settings - Update own profile; password change requires the
/// current password.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<UpdateSettingsInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    let account = admin::get_admin(&state.pool, &auth.account_id)
        .await?
        .ok_or(AppError::NotFound("Account"))?;

    if let Some(existing) = admin::get_admin_by_email(&state.pool, &input.email).await? {
        if existing.id != account.id {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }
    }

    if let Some(new_password) = &input.new_password {
        let current = input
            .current_password
            .as_deref()
            .ok_or_else(|| {
                AppError::ValidationError(
                    "current_password is required to change the password".to_string(),
                )
            })?;

        if !verify_password(current, &account.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = hash_password(new_password)?;
        admin::update_admin_password(&state.pool, &account.id, &password_hash).await?;
        info!(admin_id = %account.id, "Admin password changed");
    }

    admin::update_admin_profile(&state.pool, &account.id, &input.name, &input.email).await?;

    Ok(Json(json!({"status": "ok"})))
}
