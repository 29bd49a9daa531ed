use sqlx::SqlitePool;

use super::now_timestamp;

/// Nutritionist account row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: i64,
}

pub async fn get_admin(pool: &SqlitePool, id: &str) -> anyhow::Result<Option<AdminRow>> {
    let admin = sqlx::query_as::<_, AdminRow>(
        "SELECT id, name, email, password_hash, created_at FROM admins WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(admin)
}

pub async fn get_admin_by_email(pool: &SqlitePool, email: &str) -> anyhow::Result<Option<AdminRow>> {
    let admin = sqlx::query_as::<_, AdminRow>(
        "SELECT id, name, email, password_hash, created_at FROM admins WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(admin)
}

pub async fn insert_admin(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    email: &str,
    password_hash: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO admins (id, name, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_admin_profile(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    email: &str,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE admins SET name = ?, email = ? WHERE id = ?")
        .bind(name)
        .bind(email)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn update_admin_password(
    pool: &SqlitePool,
    id: &str,
    password_hash: &str,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE admins SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
