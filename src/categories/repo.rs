use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, user_id, name, created_at
        FROM transaction_categories
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn create(db: &PgPool, user_id: Uuid, name: &str) -> anyhow::Result<Category> {
    let row = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO transaction_categories (user_id, name)
        VALUES ($1, $2)
        RETURNING id, user_id, name, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Delete one of the caller's categories. Returns whether a row was removed.
pub async fn delete(db: &PgPool, user_id: Uuid, category_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM transaction_categories
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(category_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn belongs_to_user(
    db: &PgPool,
    user_id: Uuid,
    category_id: Uuid,
) -> anyhow::Result<bool> {
    let row = sqlx::query_as::<_, (bool,)>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM transaction_categories WHERE id = $1 AND user_id = $2
        )
        "#,
    )
    .bind(category_id)
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(row.0)
}
