use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use nutriplan_user::hash_password;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use ulid::Ulid;
use validator::Validate;

use crate::error::AppError;
use crate::queries::patient::{self, PatientRow};
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct PatientResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<PatientRow> for PatientResponse {
    fn from(row: PatientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            birth_date: row.birth_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// GET /admin/patients
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let patients = patient::list_patients(&state.pool).await?;
    let patients: Vec<PatientResponse> = patients.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "patients": patients })))
}

#[derive(Deserialize, Validate)]
pub struct CreatePatientInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub notes: Option<String>,
}

/// POST /admin/patients
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePatientInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    validate_date_opt("birth_date", input.birth_date.as_deref())?;

    if patient::get_patient_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "A patient with this email already exists".to_string(),
        ));
    }

    let id = Ulid::new().to_string();
    let password_hash = hash_password(&input.password)?;

    patient::insert_patient(
        &state.pool,
        &id,
        &input.name,
        &input.email,
        &password_hash,
        input.phone.as_deref(),
        input.birth_date.as_deref(),
        input.notes.as_deref(),
    )
    .await?;

    info!(patient_id = %id, "Patient created");

    let created = patient::get_patient(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Patient"))?;

    Ok((
        StatusCode::CREATED,
        Json(PatientResponse::from(created)),
    ))
}

/// GET /admin/patients/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = patient::get_patient(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Patient"))?;

    Ok(Json(PatientResponse::from(row)))
}

#[derive(Deserialize, Validate)]
pub struct UpdatePatientInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub notes: Option<String>,
}

/// PUT /admin/patients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePatientInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    validate_date_opt("birth_date", input.birth_date.as_deref())?;

    patient::get_patient(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Patient"))?;

    if let Some(existing) = patient::get_patient_by_email(&state.pool, &input.email).await? {
        if existing.id != id {
            return Err(AppError::Conflict(
                "A patient with this email already exists".to_string(),
            ));
        }
    }

    patient::update_patient(
        &state.pool,
        &id,
        &input.name,
        &input.email,
        input.phone.as_deref(),
        input.birth_date.as_deref(),
        input.notes.as_deref(),
    )
    .await?;

    let updated = patient::get_patient(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("Patient"))?;

    Ok(Json(PatientResponse::from(updated)))
}

/// DELETE /admin/patients/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !patient::delete_patient(&state.pool, &id).await? {
        return Err(AppError::NotFound("Patient"));
    }

    info!(patient_id = %id, "Patient deleted");
    Ok(Json(json!({"status": "deleted"})))
}

/// Dates coming from the admin forms must be real `YYYY-MM-DD` values;
/// unlike the patient-facing deriver there is no reason to be lenient here.
pub fn validate_date_opt(field: &'static str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(v) if chrono::NaiveDate::parse_from_str(v, "%Y-%m-%d").is_err() => Err(
            AppError::ValidationError(format!("{field} must be a YYYY-MM-DD date")),
        ),
        _ => Ok(()),
    }
}
