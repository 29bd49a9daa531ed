use sqlx::SqlitePool;

/// Meal category row (breakfast, lunch, snacks, ...).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
}

pub async fn list_categories(pool: &SqlitePool) -> anyhow::Result<Vec<CategoryRow>> {
    let categories = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, sort_order FROM meal_categories ORDER BY sort_order, name",
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn get_category(pool: &SqlitePool, id: &str) -> anyhow::Result<Option<CategoryRow>> {
    let category = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, sort_order FROM meal_categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

pub async fn insert_category(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    sort_order: i64,
) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO meal_categories (id, name, sort_order) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(sort_order)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn update_category(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    sort_order: i64,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE meal_categories SET name = ?, sort_order = ? WHERE id = ?")
        .bind(name)
        .bind(sort_order)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// True when any recipe or allowed item still references the category.
/// Deletion is refused in that case (surfaces as a 409).
pub async fn category_in_use(pool: &SqlitePool, id: &str) -> anyhow::Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM recipes WHERE category_id = ?1)
              + (SELECT COUNT(*) FROM allowed_items WHERE category_id = ?1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

pub async fn delete_category(pool: &SqlitePool, id: &str) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM meal_categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
