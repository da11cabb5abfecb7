use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::transactions::repo::Transaction;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Body for create and full update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    #[serde(default)]
    pub title: String,
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(with = "iso_date")]
    pub occurred_on: Date,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_currency() -> String {
    "USD".into()
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(with = "iso_date")]
    pub occurred_on: Date,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            category_id: t.category_id,
            title: t.title,
            amount: t.amount,
            currency: t.currency,
            occurred_on: t.occurred_on,
            notes: t.notes,
            created_at: t.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_defaults_currency_to_usd() {
        let input: TransactionInput = serde_json::from_str(
            r#"{"title":"Groceries","amount":"12.50","occurredOn":"2026-08-01"}"#,
        )
        .unwrap();
        assert_eq!(input.currency, "USD");
        assert_eq!(input.amount, Decimal::new(1250, 2));
        assert!(input.category_id.is_none());
    }

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn response_keeps_decimal_precision() {
        let value = serde_json::to_value(TransactionResponse {
            id: Uuid::new_v4(),
            category_id: None,
            title: "Rent".into(),
            amount: Decimal::new(99999, 2),
            currency: "EUR".into(),
            occurred_on: time::macros::date!(2026 - 08 - 01),
            notes: None,
            created_at: OffsetDateTime::now_utc(),
        })
        .unwrap();
        assert_eq!(value["amount"], serde_json::json!("999.99"));
        assert_eq!(value["occurredOn"], serde_json::json!("2026-08-01"));
    }
}
