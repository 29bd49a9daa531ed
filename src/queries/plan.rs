use nutriplan_plan::{PlanStatus, PlanSummary};
use sqlx::SqlitePool;
use std::str::FromStr;

use super::now_timestamp;

/// Meal plan row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealPlanRow {
    pub id: String,
    pub patient_id: String,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub due_date_new_meal_plan: Option<String>,
    pub payment_url_new_meal_plan: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MealPlanRow {
    /// Read shape consumed by the expiration deriver. An unknown status in
    /// the column degrades to `active` rather than failing the render.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            id: self.id.clone(),
            end_date: self.end_date.clone(),
            due_date_new_meal_plan: self.due_date_new_meal_plan.clone(),
            payment_url_new_meal_plan: self.payment_url_new_meal_plan.clone(),
            status: PlanStatus::from_str(&self.status).unwrap_or(PlanStatus::Active),
        }
    }
}

const COLUMNS: &str = "id, patient_id, title, start_date, end_date, due_date_new_meal_plan, \
                       payment_url_new_meal_plan, status, notes, created_at, updated_at";

pub async fn list_plans_for_patient(
    pool: &SqlitePool,
    patient_id: &str,
) -> anyhow::Result<Vec<MealPlanRow>> {
    let plans = sqlx::query_as::<_, MealPlanRow>(&format!(
        "SELECT {COLUMNS} FROM meal_plans WHERE patient_id = ? ORDER BY created_at DESC"
    ))
    .bind(patient_id)
    .fetch_all(pool)
    .await?;

    Ok(plans)
}

pub async fn get_plan(pool: &SqlitePool, id: &str) -> anyhow::Result<Option<MealPlanRow>> {
    let plan =
        sqlx::query_as::<_, MealPlanRow>(&format!("SELECT {COLUMNS} FROM meal_plans WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(plan)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_plan(
    pool: &SqlitePool,
    id: &str,
    patient_id: &str,
    title: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
    due_date_new_meal_plan: Option<&str>,
    payment_url_new_meal_plan: Option<&str>,
    status: PlanStatus,
    notes: Option<&str>,
) -> anyhow::Result<()> {
    let now = now_timestamp();
    sqlx::query(
        "INSERT INTO meal_plans (id, patient_id, title, start_date, end_date, due_date_new_meal_plan,
                                 payment_url_new_meal_plan, status, notes, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(patient_id)
    .bind(title)
    .bind(start_date)
    .bind(end_date)
    .bind(due_date_new_meal_plan)
    .bind(payment_url_new_meal_plan)
    .bind(status.to_string())
    .bind(notes)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn update_plan(
    pool: &SqlitePool,
    id: &str,
    title: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
    due_date_new_meal_plan: Option<&str>,
    payment_url_new_meal_plan: Option<&str>,
    status: PlanStatus,
    notes: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE meal_plans SET title = ?, start_date = ?, end_date = ?, due_date_new_meal_plan = ?,
                               payment_url_new_meal_plan = ?, status = ?, notes = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(title)
    .bind(start_date)
    .bind(end_date)
    .bind(due_date_new_meal_plan)
    .bind(payment_url_new_meal_plan)
    .bind(status.to_string())
    .bind(notes)
    .bind(now_timestamp())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_plan(pool: &SqlitePool, id: &str) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM meal_plans WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
