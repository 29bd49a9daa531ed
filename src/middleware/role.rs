use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use nutriplan_user::Role;

use crate::error::AppError;
use crate::middleware::Auth;

/// Gate for the nutritionist portal. Must run after `auth_middleware`.
pub async fn require_admin(req: Request, next: Next) -> Response {
    match req.extensions().get::<Auth>() {
        Some(auth) if auth.role == Role::Admin => next.run(req).await,
        Some(_) => AppError::Forbidden.into_response(),
        None => AppError::Unauthorized.into_response(),
    }
}

/// Gate for the patient portal. Must run after `auth_middleware`.
pub async fn require_patient(req: Request, next: Next) -> Response {
    match req.extensions().get::<Auth>() {
        Some(auth) if auth.role == Role::Patient => next.run(req).await,
        Some(_) => AppError::Forbidden.into_response(),
        None => AppError::Unauthorized.into_response(),
    }
}
