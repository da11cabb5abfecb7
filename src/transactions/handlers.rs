use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::SessionUser,
    categories,
    error::{ApiError, FieldError},
    state::AppState,
    transactions::{
        dto::{Pagination, TransactionInput, TransactionResponse},
        repo::{self, TransactionRecord},
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/transactions", get(list_transactions))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions/:id", put(update_transaction))
        .route("/transactions/:id", delete(delete_transaction))
}

/// Checks the input and confirms a referenced category is the caller's own.
async fn validate_input(
    state: &AppState,
    user_id: Uuid,
    input: &TransactionInput,
) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if input.title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title must not be empty"));
    }
    if input.currency.trim().is_empty() {
        errors.push(FieldError::new("currency", "Currency must not be empty"));
    }
    if let Some(category_id) = input.category_id {
        let owned = categories::repo::belongs_to_user(&state.db, user_id, category_id)
            .await
            .map_err(ApiError::Storage)?;
        if !owned {
            errors.push(FieldError::new("categoryId", "Unknown category"));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

fn to_record(input: &TransactionInput) -> TransactionRecord<'_> {
    TransactionRecord {
        category_id: input.category_id,
        title: input.title.trim(),
        amount: input.amount,
        currency: input.currency.trim(),
        occurred_on: input.occurred_on,
        notes: input.notes.as_deref(),
    }
}

#[instrument(skip_all)]
pub async fn list_transactions(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let rows = repo::list_by_user(&state.db, user_id, page.limit, page.offset)
        .await
        .map_err(ApiError::Storage)?;
    Ok(Json(
        rows.into_iter().map(TransactionResponse::from).collect(),
    ))
}

#[instrument(skip_all)]
pub async fn create_transaction(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Json(payload): Json<TransactionInput>,
) -> Result<Json<TransactionResponse>, ApiError> {
    validate_input(&state, user_id, &payload).await?;

    let transaction = repo::create(&state.db, user_id, to_record(&payload))
        .await
        .map_err(ApiError::Storage)?;

    info!(transaction_id = %transaction.id, "transaction created");
    Ok(Json(transaction.into()))
}

#[instrument(skip_all)]
pub async fn update_transaction(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<TransactionInput>,
) -> Result<Json<TransactionResponse>, ApiError> {
    validate_input(&state, user_id, &payload).await?;

    let transaction = repo::update(&state.db, user_id, transaction_id, to_record(&payload))
        .await
        .map_err(ApiError::Storage)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(transaction.into()))
}

#[instrument(skip_all)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(transaction_id): Path<Uuid>,
) -> Result<&'static str, ApiError> {
    let removed = repo::delete(&state.db, user_id, transaction_id)
        .await
        .map_err(ApiError::Storage)?;
    if !removed {
        return Err(ApiError::NotFound);
    }
    Ok("Deleted")
}
