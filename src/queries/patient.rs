use sqlx::SqlitePool;

use super::now_timestamp;

/// Patient account row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PatientRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

const COLUMNS: &str = "id, name, email, password_hash, phone, birth_date, notes, created_at, updated_at";

pub async fn list_patients(pool: &SqlitePool) -> anyhow::Result<Vec<PatientRow>> {
    let patients = sqlx::query_as::<_, PatientRow>(&format!(
        "SELECT {COLUMNS} FROM patients ORDER BY name COLLATE NOCASE"
    ))
    .fetch_all(pool)
    .await?;

    Ok(patients)
}

pub async fn get_patient(pool: &SqlitePool, id: &str) -> anyhow::Result<Option<PatientRow>> {
    let patient =
        sqlx::query_as::<_, PatientRow>(&format!("SELECT {COLUMNS} FROM patients WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(patient)
}

pub async fn get_patient_by_email(
    pool: &SqlitePool,
    email: &str,
) -> anyhow::Result<Option<PatientRow>> {
    let patient =
        sqlx::query_as::<_, PatientRow>(&format!("SELECT {COLUMNS} FROM patients WHERE email = ?"))
            .bind(email)
            .fetch_optional(pool)
            .await?;

    Ok(patient)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_patient(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    email: &str,
    password_hash: &str,
    phone: Option<&str>,
    birth_date: Option<&str>,
    notes: Option<&str>,
) -> anyhow::Result<()> {
    let now = now_timestamp();
    sqlx::query(
        "INSERT INTO patients (id, name, email, password_hash, phone, birth_date, notes, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(phone)
    .bind(birth_date)
    .bind(notes)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_patient(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    email: &str,
    phone: Option<&str>,
    birth_date: Option<&str>,
    notes: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE patients SET name = ?, email = ?, phone = ?, birth_date = ?, notes = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(birth_date)
    .bind(notes)
    .bind(now_timestamp())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_patient_password(
    pool: &SqlitePool,
    id: &str,
    password_hash: &str,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE patients SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(now_timestamp())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete a patient; plans, allowed items and payments cascade.
pub async fn delete_patient(pool: &SqlitePool, id: &str) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM patients WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
