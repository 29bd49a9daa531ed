use sqlx::SqlitePool;

use super::now_timestamp;

/// Password reset token row. Only the SHA3-256 digest of the token is
/// stored; the raw value exists solely in the emailed link.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResetTokenRow {
    pub id: String,
    pub account_role: String,
    pub account_id: String,
    pub token_hash: String,
    pub expires_at: i64,
    pub used_at: Option<i64>,
    pub created_at: i64,
}

pub async fn insert_token(
    pool: &SqlitePool,
    id: &str,
    account_role: &str,
    account_id: &str,
    token_hash: &str,
    ttl_seconds: i64,
) -> anyhow::Result<()> {
    let now = now_timestamp();
    sqlx::query(
        "INSERT INTO password_reset_tokens (id, account_role, account_id, token_hash, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(account_role)
    .bind(account_id)
    .bind(token_hash)
    .bind(now + ttl_seconds)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Look up an unexpired, unused token by its digest.
pub async fn find_valid_token(
    pool: &SqlitePool,
    token_hash: &str,
) -> anyhow::Result<Option<ResetTokenRow>> {
    let token = sqlx::query_as::<_, ResetTokenRow>(
        "SELECT id, account_role, account_id, token_hash, expires_at, used_at, created_at
         FROM password_reset_tokens
         WHERE token_hash = ? AND used_at IS NULL AND expires_at > ?",
    )
    .bind(token_hash)
    .bind(now_timestamp())
    .fetch_optional(pool)
    .await?;

    Ok(token)
}

/// Single-use: burn the token once the password has been changed.
pub async fn mark_token_used(pool: &SqlitePool, id: &str) -> anyhow::Result<()> {
    sqlx::query("UPDATE password_reset_tokens SET used_at = ? WHERE id = ?")
        .bind(now_timestamp())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
