use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::SessionUser,
    categories::{
        dto::{CategoryResponse, CreateCategoryRequest},
        repo,
    },
    error::{ApiError, FieldError},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories/:id", delete(delete_category))
}

#[instrument(skip_all)]
pub async fn list_categories(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let rows = repo::list_by_user(&state.db, user_id)
        .await
        .map_err(ApiError::Storage)?;
    Ok(Json(rows.into_iter().map(CategoryResponse::from).collect()))
}

#[instrument(skip_all)]
pub async fn create_category(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "name",
            "Name must not be empty",
        )]));
    }

    let category = repo::create(&state.db, user_id, name)
        .await
        .map_err(ApiError::Storage)?;

    info!(category_id = %category.id, "category created");
    Ok(Json(category.into()))
}

#[instrument(skip_all)]
pub async fn delete_category(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(category_id): Path<Uuid>,
) -> Result<&'static str, ApiError> {
    let removed = repo::delete(&state.db, user_id, category_id)
        .await
        .map_err(ApiError::Storage)?;
    if !removed {
        return Err(ApiError::NotFound);
    }
    Ok("Deleted")
}
