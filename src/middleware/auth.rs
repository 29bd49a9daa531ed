use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use nutriplan_user::{validate_token, Role};

use crate::error::AppError;
use crate::routes::AppState;

pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// Auth extension inserted for every request that passed the session check.
#[derive(Clone, Debug)]
pub struct Auth {
    pub account_id: String,
    pub role: Role,
}

/// Session middleware: validates the JWT from the `auth_token` cookie and
/// verifies the account still exists in its table.
///
/// Rejects with a JSON 401 when the token is missing, invalid, or the
/// account was deleted since the token was issued.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(cookie) = jar.get(AUTH_COOKIE_NAME) else {
        tracing::debug!("Missing auth_token cookie");
        return AppError::Unauthorized.into_response();
    };

    let account = match validate_token(cookie.value(), &state.config.jwt.secret) {
        Ok(account) => account,
        Err(e) => {
            tracing::warn!("Invalid session token: {:?}", e);
            return AppError::Unauthorized.into_response();
        }
    };

    let table = match account.role {
        Role::Admin => "admins",
        Role::Patient => "patients",
    };
    let exists = sqlx::query(&format!("SELECT id FROM {table} WHERE id = ?1"))
        .bind(&account.account_id)
        .fetch_optional(&state.pool)
        .await;

    match exists {
        Ok(Some(_)) => {
            req.extensions_mut().insert(Auth {
                account_id: account.account_id,
                role: account.role,
            });
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!(
                account_id = %account.account_id,
                role = %account.role,
                "Session token for deleted account"
            );
            AppError::Unauthorized.into_response()
        }
        Err(e) => {
            tracing::error!("Database error checking account existence: {:?}", e);
            AppError::Unauthorized.into_response()
        }
    }
}
