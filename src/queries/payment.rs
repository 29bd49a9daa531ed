use sqlx::SqlitePool;

use super::now_timestamp;

/// Payment record for a meal plan renewal.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: String,
    pub meal_plan_id: String,
    pub amount: f64,
    pub status: String,
    pub external_url: Option<String>,
    pub paid_at: Option<i64>,
    pub created_at: i64,
}

const COLUMNS: &str = "id, meal_plan_id, amount, status, external_url, paid_at, created_at";

pub async fn list_payments_for_plan(
    pool: &SqlitePool,
    meal_plan_id: &str,
) -> anyhow::Result<Vec<PaymentRow>> {
    let payments = sqlx::query_as::<_, PaymentRow>(&format!(
        "SELECT {COLUMNS} FROM payments WHERE meal_plan_id = ? ORDER BY created_at DESC"
    ))
    .bind(meal_plan_id)
    .fetch_all(pool)
    .await?;

    Ok(payments)
}

pub async fn get_payment(pool: &SqlitePool, id: &str) -> anyhow::Result<Option<PaymentRow>> {
    let payment =
        sqlx::query_as::<_, PaymentRow>(&format!("SELECT {COLUMNS} FROM payments WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(payment)
}

pub async fn insert_payment(
    pool: &SqlitePool,
    id: &str,
    meal_plan_id: &str,
    amount: f64,
    external_url: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO payments (id, meal_plan_id, amount, status, external_url, created_at)
         VALUES (?, ?, ?, 'pending', ?, ?)",
    )
    .bind(id)
    .bind(meal_plan_id)
    .bind(amount)
    .bind(external_url)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    Ok(())
}

/// Update a payment's status. `paid_at` is stamped when transitioning to
/// `paid` and cleared otherwise.
pub async fn update_payment_status(
    pool: &SqlitePool,
    id: &str,
    status: &str,
    external_url: Option<&str>,
) -> anyhow::Result<()> {
    let paid_at = (status == "paid").then(now_timestamp);
    sqlx::query("UPDATE payments SET status = ?, external_url = ?, paid_at = ? WHERE id = ?")
        .bind(status)
        .bind(external_url)
        .bind(paid_at)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
