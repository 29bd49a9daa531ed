use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::EmailService;
use crate::middleware::{auth_middleware, require_admin, require_patient};

pub mod admin;
pub mod auth;
pub mod health;
pub mod portal;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub email: EmailService,
}

pub fn router(state: AppState) -> Router {
    // Nutritionist portal
    let admin_routes = Router::new()
        .route(
            "/patients",
            get(admin::patients::list).post(admin::patients::create),
        )
        .route(
            "/patients/{id}",
            get(admin::patients::detail)
                .put(admin::patients::update)
                .delete(admin::patients::remove),
        )
        .route(
            "/patients/{id}/plans",
            get(admin::plans::list_for_patient).post(admin::plans::create),
        )
        .route(
            "/plans/{id}",
            get(admin::plans::detail)
                .put(admin::plans::update)
                .delete(admin::plans::remove),
        )
        .route(
            "/plans/{id}/allowed-items",
            get(admin::allowed_items::list).post(admin::allowed_items::create),
        )
        .route(
            "/allowed-items/{id}",
            put(admin::allowed_items::update).delete(admin::allowed_items::remove),
        )
        .route(
            "/recipes",
            get(admin::recipes::list).post(admin::recipes::create),
        )
        .route(
            "/recipes/{id}",
            get(admin::recipes::detail)
                .put(admin::recipes::update)
                .delete(admin::recipes::remove),
        )
        .route(
            "/categories",
            get(admin::categories::list).post(admin::categories::create),
        )
        .route(
            "/categories/{id}",
            put(admin::categories::update).delete(admin::categories::remove),
        )
        .route(
            "/plans/{id}/payments",
            get(admin::payments::list).post(admin::payments::create),
        )
        .route("/payments/{id}", put(admin::payments::update))
        .route(
            "/settings",
            get(admin::settings::show).put(admin::settings::update),
        )
        .route_layer(axum_middleware::from_fn(require_admin));

    // Patient portal
    let portal_routes = Router::new()
        .route("/", get(portal::profile::show))
        .route("/settings", put(portal::profile::update_settings))
        .route("/plans", get(portal::plans::list))
        .route("/plans/{id}", get(portal::plans::detail))
        .route("/recipes", get(portal::recipes::list))
        .route_layer(axum_middleware::from_fn(require_patient));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .nest("/admin", admin_routes)
        .nest("/me", portal_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(state.pool.clone())
        .merge(
            Router::new()
                .route("/auth/admin/login", post(auth::admin_login))
                .route("/auth/patient/login", post(auth::patient_login))
                .route("/auth/password-reset", post(auth::request_password_reset))
                .route(
                    "/auth/password-reset/{token}",
                    post(auth::complete_password_reset),
                )
                .merge(protected_routes)
                .with_state(state),
        )
        .layer(TraceLayer::new_for_http())
}
