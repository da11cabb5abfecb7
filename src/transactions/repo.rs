use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub amount: Decimal,
    pub currency: String,
    pub occurred_on: Date,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Column values for an insert or full update.
#[derive(Debug)]
pub struct TransactionRecord<'a> {
    pub category_id: Option<Uuid>,
    pub title: &'a str,
    pub amount: Decimal,
    pub currency: &'a str,
    pub occurred_on: Date,
    pub notes: Option<&'a str>,
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Transaction>> {
    let rows = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT id, user_id, category_id, title, amount, currency, occurred_on, notes, created_at
        FROM transactions
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    record: TransactionRecord<'_>,
) -> anyhow::Result<Transaction> {
    let row = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (user_id, category_id, title, amount, currency, occurred_on, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, category_id, title, amount, currency, occurred_on, notes, created_at
        "#,
    )
    .bind(user_id)
    .bind(record.category_id)
    .bind(record.title)
    .bind(record.amount)
    .bind(record.currency)
    .bind(record.occurred_on)
    .bind(record.notes)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Full update of one of the caller's transactions. `None` when the id does
/// not exist or belongs to someone else.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    transaction_id: Uuid,
    record: TransactionRecord<'_>,
) -> anyhow::Result<Option<Transaction>> {
    let row = sqlx::query_as::<_, Transaction>(
        r#"
        UPDATE transactions
        SET category_id = $3, title = $4, amount = $5, currency = $6, occurred_on = $7, notes = $8
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, category_id, title, amount, currency, occurred_on, notes, created_at
        "#,
    )
    .bind(transaction_id)
    .bind(user_id)
    .bind(record.category_id)
    .bind(record.title)
    .bind(record.amount)
    .bind(record.currency)
    .bind(record.occurred_on)
    .bind(record.notes)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, user_id: Uuid, transaction_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM transactions
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(transaction_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}
