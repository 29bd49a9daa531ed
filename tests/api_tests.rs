//! End-to-end tests through the full router with an in-memory database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use nutriplan::config::{
    BillingConfig, Config, DatabaseConfig, EmailConfig, JwtConfig, ObservabilityConfig,
    ServerConfig,
};
use nutriplan::queries;
use nutriplan_plan::PlanStatus;
use nutriplan_user::hash_password;
use serde_json::{json, Value};
use sqlx::sqlite::{SqlitePoolOptions, SqliteConnectOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tower::ServiceExt;
use ulid::Ulid;

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_string(),
            expiration_days: 7,
        },
        email: EmailConfig::default(),
        observability: ObservabilityConfig::default(),
        billing: BillingConfig::default(),
    }
}

async fn setup() -> (Router, SqlitePool) {
    // A single connection keeps every request on the same in-memory db.
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    let app = nutriplan::create_app(pool.clone(), test_config());
    (app, pool)
}

async fn seed_admin(pool: &SqlitePool, email: &str, password: &str) -> String {
    let id = Ulid::new().to_string();
    let hash = hash_password(password).unwrap();
    queries::admin::insert_admin(pool, &id, "Dra. Ana", email, &hash)
        .await
        .unwrap();
    id
}

async fn seed_patient(pool: &SqlitePool, email: &str, password: &str) -> String {
    let id = Ulid::new().to_string();
    let hash = hash_password(password).unwrap();
    queries::patient::insert_patient(pool, &id, "João", email, &hash, None, None, None)
        .await
        .unwrap();
    id
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body, set_cookie)
}

async fn login(app: &Router, portal: &str, email: &str, password: &str) -> String {
    let (status, _, cookie) = request(
        app,
        "POST",
        &format!("/auth/{portal}/login"),
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    cookie.expect("login must set the session cookie")
}

fn local_date_offset(days: i64) -> String {
    (chrono::Local::now().date_naive() + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let (app, _pool) = setup().await;
    let (status, body, _) = request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, pool) = setup().await;
    seed_admin(&pool, "ana@example.com", "correct-horse-battery").await;

    let (status, body, cookie) = request(
        &app,
        "POST",
        "/auth/admin/login",
        None,
        Some(json!({"email": "ana@example.com", "password": "wrong"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
    assert!(cookie.is_none());
}

#[tokio::test]
async fn login_sets_auth_cookie() {
    let (app, pool) = setup().await;
    seed_admin(&pool, "ana@example.com", "correct-horse-battery").await;

    let cookie = login(&app, "admin", "ana@example.com", "correct-horse-battery").await;
    assert!(cookie.starts_with("auth_token="));
}

#[tokio::test]
async fn protected_routes_require_session() {
    let (app, _pool) = setup().await;

    let (status, _, _) = request(&app, "GET", "/admin/patients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = request(&app, "GET", "/me/plans", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn patient_cannot_reach_admin_portal() {
    let (app, pool) = setup().await;
    seed_patient(&pool, "joao@example.com", "patient-password").await;

    let cookie = login(&app, "patient", "joao@example.com", "patient-password").await;
    let (status, body, _) = request(&app, "GET", "/admin/patients", Some(&cookie), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn admin_patient_crud_round_trip() {
    let (app, pool) = setup().await;
    seed_admin(&pool, "ana@example.com", "correct-horse-battery").await;
    let cookie = login(&app, "admin", "ana@example.com", "correct-horse-battery").await;

    // Create
    let (status, created, _) = request(
        &app,
        "POST",
        "/admin/patients",
        Some(&cookie),
        Some(json!({
            "name": "Maria Silva",
            "email": "maria@example.com",
            "password": "initial-password",
            "phone": "+55 11 99999-0000"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let patient_id = created["id"].as_str().unwrap().to_string();

    // Duplicate email conflicts
    let (status, _, _) = request(
        &app,
        "POST",
        "/admin/patients",
        Some(&cookie),
        Some(json!({
            "name": "Other",
            "email": "maria@example.com",
            "password": "whatever-else"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // List
    let (status, body, _) = request(&app, "GET", "/admin/patients", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patients"].as_array().unwrap().len(), 1);

    // Update
    let (status, updated, _) = request(
        &app,
        "PUT",
        &format!("/admin/patients/{patient_id}"),
        Some(&cookie),
        Some(json!({"name": "Maria S. Santos", "email": "maria@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Maria S. Santos");

    // Delete
    let (status, _, _) = request(
        &app,
        "DELETE",
        &format!("/admin/patients/{patient_id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = request(
        &app,
        "GET",
        &format!("/admin/patients/{patient_id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn plan_due_today_surfaces_badge_and_alert() {
    let (app, pool) = setup().await;
    let patient_id = seed_patient(&pool, "joao@example.com", "patient-password").await;

    let plan_id = Ulid::new().to_string();
    queries::plan::insert_plan(
        &pool,
        &plan_id,
        &patient_id,
        "Plano de emagrecimento",
        None,
        Some(&local_date_offset(0)),
        None,
        None,
        PlanStatus::Active,
        None,
    )
    .await
    .unwrap();

    let cookie = login(&app, "patient", "joao@example.com", "patient-password").await;

    let (status, body, _) = request(&app, "GET", "/me/plans", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["badge"]["label"], "Vence hoje");
    assert_eq!(body["alert"]["tier"], "due_today");

    let (status, body, _) = request(
        &app,
        "GET",
        &format!("/me/plans/{plan_id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alert"]["tier"], "due_today");
    assert_eq!(body["alert"]["action"]["kind"], "fill_form");
}

#[tokio::test]
async fn warning_tier_hidden_in_list_but_priced_in_detail() {
    let (app, pool) = setup().await;
    let patient_id = seed_patient(&pool, "joao@example.com", "patient-password").await;

    let plan_id = Ulid::new().to_string();
    queries::plan::insert_plan(
        &pool,
        &plan_id,
        &patient_id,
        "Plano trimestral",
        None,
        Some(&local_date_offset(4)),
        None,
        None,
        PlanStatus::Active,
        None,
    )
    .await
    .unwrap();

    let cookie = login(&app, "patient", "joao@example.com", "patient-password").await;

    let (status, body, _) = request(&app, "GET", "/me/plans", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["alert"].is_null(), "warning is suppressed in lists");
    assert!(body["badge"].is_null(), "warning never badges");

    let (_, body, _) = request(
        &app,
        "GET",
        &format!("/me/plans/{plan_id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(body["alert"]["tier"], "warning");
    assert_eq!(body["alert"]["price_display"], "R$ 97,00");
}

#[tokio::test]
async fn current_plan_keeps_the_expired_one_quiet() {
    let (app, pool) = setup().await;
    let patient_id = seed_patient(&pool, "joao@example.com", "patient-password").await;

    for (title, offset) in [("Antigo", -3), ("Vigente", 30)] {
        queries::plan::insert_plan(
            &pool,
            &Ulid::new().to_string(),
            &patient_id,
            title,
            None,
            Some(&local_date_offset(offset)),
            None,
            None,
            PlanStatus::Active,
            None,
        )
        .await
        .unwrap();
    }

    let cookie = login(&app, "patient", "joao@example.com", "patient-password").await;
    let (status, body, _) = request(&app, "GET", "/me/plans", Some(&cookie), None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["alert"].is_null());
    assert!(body["badge"].is_null());
}

#[tokio::test]
async fn patient_cannot_read_another_patients_plan() {
    let (app, pool) = setup().await;
    let owner_id = seed_patient(&pool, "joao@example.com", "patient-password").await;
    seed_patient(&pool, "pedro@example.com", "patient-password").await;

    let plan_id = Ulid::new().to_string();
    queries::plan::insert_plan(
        &pool,
        &plan_id,
        &owner_id,
        "Plano",
        None,
        None,
        None,
        None,
        PlanStatus::Active,
        None,
    )
    .await
    .unwrap();

    let cookie = login(&app, "patient", "pedro@example.com", "patient-password").await;
    let (status, _, _) = request(
        &app,
        "GET",
        &format!("/me/plans/{plan_id}"),
        Some(&cookie),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_in_use_cannot_be_deleted() {
    let (app, pool) = setup().await;
    seed_admin(&pool, "ana@example.com", "correct-horse-battery").await;
    let cookie = login(&app, "admin", "ana@example.com", "correct-horse-battery").await;

    let (status, category, _) = request(
        &app,
        "POST",
        "/admin/categories",
        Some(&cookie),
        Some(json!({"name": "Café da manhã", "sort_order": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_str().unwrap().to_string();

    let (status, _, _) = request(
        &app,
        "POST",
        "/admin/recipes",
        Some(&cookie),
        Some(json!({
            "category_id": category_id,
            "title": "Omelete de claras",
            "instructions": "Bata as claras e leve à frigideira."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body, _) = request(
        &app,
        "DELETE",
        &format!("/admin/categories/{category_id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn password_reset_flow_changes_password() {
    let (app, pool) = setup().await;
    let patient_id = seed_patient(&pool, "joao@example.com", "old-password-123").await;

    // Request never reveals whether the account exists.
    let (status, body, _) = request(
        &app,
        "POST",
        "/auth/password-reset",
        None,
        Some(json!({"email": "joao@example.com", "role": "patient"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _, _) = request(
        &app,
        "POST",
        "/auth/password-reset",
        None,
        Some(json!({"email": "nobody@example.com", "role": "patient"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The raw token from the request above only exists in the (mocked)
    // email, so complete the flow with a token we issued ourselves.
    let token = nutriplan_user::generate_reset_token();
    queries::reset_token::insert_token(&pool, &token.id, "patient", &patient_id, &token.hash, 3600)
        .await
        .unwrap();

    let (status, _, _) = request(
        &app,
        "POST",
        &format!("/auth/password-reset/{}", token.raw),
        None,
        Some(json!({"password": "new-password-456"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old password out, new password in.
    let (status, _, _) = request(
        &app,
        "POST",
        "/auth/patient/login",
        None,
        Some(json!({"email": "joao@example.com", "password": "old-password-123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    login(&app, "patient", "joao@example.com", "new-password-456").await;

    // Tokens are single use.
    let (status, _, _) = request(
        &app,
        "POST",
        &format!("/auth/password-reset/{}", token.raw),
        None,
        Some(json!({"password": "third-password-789"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
