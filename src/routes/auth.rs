//! Login, logout and password reset for both portals.

use axum::{extract::Path, extract::State, response::IntoResponse, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use nutriplan_user::{
    generate_reset_token, generate_token, hash_password, hash_reset_token, verify_password, Role,
    RESET_TOKEN_TTL_SECONDS,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::auth::AUTH_COOKIE_NAME;
use crate::queries::{admin, patient, reset_token};
use crate::routes::AppState;

#[derive(Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// POST /auth/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    let account = admin::get_admin_by_email(&state.pool, &input.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&input.password, &account.password_hash)? {
        warn!(email = %input.email, "Admin login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let jar = add_session_cookie(jar, &state, account.id.clone(), Role::Admin)?;
    info!(admin_id = %account.id, "Admin logged in");

    Ok((
        jar,
        Json(json!({
            "id": account.id,
            "name": account.name,
            "email": account.email,
            "role": Role::Admin,
        })),
    ))
}

/// POST /auth/patient/login
pub async fn patient_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    let account = patient::get_patient_by_email(&state.pool, &input.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&input.password, &account.password_hash)? {
        warn!(email = %input.email, "Patient login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let jar = add_session_cookie(jar, &state, account.id.clone(), Role::Patient)?;
    info!(patient_id = %account.id, "Patient logged in");

    Ok((
        jar,
        Json(json!({
            "id": account.id,
            "name": account.name,
            "email": account.email,
            "role": Role::Patient,
        })),
    ))
}

/// POST /auth/logout - Clear the session cookie
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build((AUTH_COOKIE_NAME, "")).path("/").build());
    (jar, Json(json!({"status": "ok"})))
}

fn add_session_cookie(
    jar: CookieJar,
    state: &AppState,
    account_id: String,
    role: Role,
) -> Result<CookieJar, AppError> {
    let token = generate_token(
        account_id,
        role,
        &state.config.jwt.secret,
        state.config.jwt_lifetime_seconds(),
    )?;

    let cookie = Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok(jar.add(cookie))
}

#[derive(Deserialize, Validate)]
pub struct ResetRequestInput {
    #[validate(email)]
    pub email: String,
    pub role: Role,
}

/// POST /auth/password-reset - Request a reset link.
///
/// Always answers 200 to avoid account enumeration; the email is only sent
/// when the account actually exists.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(input): Json<ResetRequestInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    let account = match input.role {
        Role::Admin => admin::get_admin_by_email(&state.pool, &input.email)
            .await?
            .map(|a| (a.id, a.email)),
        Role::Patient => patient::get_patient_by_email(&state.pool, &input.email)
            .await?
            .map(|p| (p.id, p.email)),
    };

    if let Some((account_id, email)) = account {
        let token = generate_reset_token();
        reset_token::insert_token(
            &state.pool,
            &token.id,
            &input.role.to_string(),
            &account_id,
            &token.hash,
            RESET_TOKEN_TTL_SECONDS,
        )
        .await?;

        if let Err(e) = state.email.send_password_reset(&email, &token.raw) {
            // The token row exists either way; a delivery failure must not
            // reveal whether the account does.
            warn!(error = %e, "Password reset email delivery failed");
        }
    }

    Ok(Json(json!({"status": "ok"})))
}

#[derive(Deserialize, Validate)]
pub struct ResetCompleteInput {
    #[validate(length(min = 8))]
    pub password: String,
}

/// POST /auth/password-reset/{token} - Complete a reset with a new password.
pub async fn complete_password_reset(
    State(state): State<AppState>,
    Path(raw_token): Path<String>,
    Json(input): Json<ResetCompleteInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    let token = reset_token::find_valid_token(&state.pool, &hash_reset_token(&raw_token))
        .await?
        .ok_or(AppError::NotFound("Reset token"))?;

    let password_hash = hash_password(&input.password)?;

    match token.account_role.as_str() {
        "admin" => admin::update_admin_password(&state.pool, &token.account_id, &password_hash).await?,
        _ => {
            patient::update_patient_password(&state.pool, &token.account_id, &password_hash).await?
        }
    }

    reset_token::mark_token_used(&state.pool, &token.id).await?;
    info!(account_id = %token.account_id, role = %token.account_role, "Password reset completed");

    Ok(Json(json!({"status": "ok"})))
}
