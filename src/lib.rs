pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod queries;
pub mod routes;

pub use db::{create_pool, run_migrations};
pub use routes::AppState;

/// Create the app router for testing.
///
/// Builds the Axum router with all routes configured and a mock email
/// transport, useful for integration testing without starting the full
/// server.
pub fn create_app(pool: sqlx::SqlitePool, config: config::Config) -> axum::Router {
    let email = email::EmailService::new_mock(&config.email);

    routes::router(AppState {
        pool,
        config,
        email,
    })
}
