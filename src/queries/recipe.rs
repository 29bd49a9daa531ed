use sqlx::SqlitePool;

use super::now_timestamp;

/// Recipe row, joined with its category name for display.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRow {
    pub id: String,
    pub category_id: String,
    pub category_name: String,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub created_at: i64,
    pub updated_at: i64,
}

const SELECT: &str = "SELECT r.id, r.category_id, c.name AS category_name, r.title, r.description,
                             r.instructions, r.created_at, r.updated_at
                      FROM recipes r JOIN meal_categories c ON c.id = r.category_id";

pub async fn list_recipes(
    pool: &SqlitePool,
    category_id: Option<&str>,
) -> anyhow::Result<Vec<RecipeRow>> {
    let recipes = match category_id {
        Some(category_id) => {
            sqlx::query_as::<_, RecipeRow>(&format!(
                "{SELECT} WHERE r.category_id = ? ORDER BY r.title COLLATE NOCASE"
            ))
            .bind(category_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, RecipeRow>(&format!(
                "{SELECT} ORDER BY c.sort_order, r.title COLLATE NOCASE"
            ))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(recipes)
}

pub async fn get_recipe(pool: &SqlitePool, id: &str) -> anyhow::Result<Option<RecipeRow>> {
    let recipe = sqlx::query_as::<_, RecipeRow>(&format!("{SELECT} WHERE r.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(recipe)
}

pub async fn insert_recipe(
    pool: &SqlitePool,
    id: &str,
    category_id: &str,
    title: &str,
    description: Option<&str>,
    instructions: &str,
) -> anyhow::Result<()> {
    let now = now_timestamp();
    sqlx::query(
        "INSERT INTO recipes (id, category_id, title, description, instructions, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(category_id)
    .bind(title)
    .bind(description)
    .bind(instructions)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_recipe(
    pool: &SqlitePool,
    id: &str,
    category_id: &str,
    title: &str,
    description: Option<&str>,
    instructions: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE recipes SET category_id = ?, title = ?, description = ?, instructions = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(category_id)
    .bind(title)
    .bind(description)
    .bind(instructions)
    .bind(now_timestamp())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_recipe(pool: &SqlitePool, id: &str) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
