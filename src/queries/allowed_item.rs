use sqlx::SqlitePool;

/// Allowed item row, joined with the category it belongs to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AllowedItemRow {
    pub id: String,
    pub meal_plan_id: String,
    pub category_id: String,
    pub category_name: String,
    pub description: String,
    pub quantity: Option<String>,
}

const SELECT: &str = "SELECT a.id, a.meal_plan_id, a.category_id, c.name AS category_name,
                             a.description, a.quantity
                      FROM allowed_items a JOIN meal_categories c ON c.id = a.category_id";

pub async fn list_items_for_plan(
    pool: &SqlitePool,
    meal_plan_id: &str,
) -> anyhow::Result<Vec<AllowedItemRow>> {
    let items = sqlx::query_as::<_, AllowedItemRow>(&format!(
        "{SELECT} WHERE a.meal_plan_id = ? ORDER BY c.sort_order, a.description COLLATE NOCASE"
    ))
    .bind(meal_plan_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn get_item(pool: &SqlitePool, id: &str) -> anyhow::Result<Option<AllowedItemRow>> {
    let item = sqlx::query_as::<_, AllowedItemRow>(&format!("{SELECT} WHERE a.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(item)
}

pub async fn insert_item(
    pool: &SqlitePool,
    id: &str,
    meal_plan_id: &str,
    category_id: &str,
    description: &str,
    quantity: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO allowed_items (id, meal_plan_id, category_id, description, quantity)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(meal_plan_id)
    .bind(category_id)
    .bind(description)
    .bind(quantity)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_item(
    pool: &SqlitePool,
    id: &str,
    category_id: &str,
    description: &str,
    quantity: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE allowed_items SET category_id = ?, description = ?, quantity = ? WHERE id = ?",
    )
    .bind(category_id)
    .bind(description)
    .bind(quantity)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_item(pool: &SqlitePool, id: &str) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM allowed_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
