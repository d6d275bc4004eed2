use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tower_sessions::Session;

use super::auth::require_admin;
use super::validation::{validate_new_product, validate_product_update};
use super::{ApiError, AppState};
use crate::models::Product;

/// GET /api/products
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.store.list_products().await)
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .store
        .get_product(id)
        .await
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    Ok(Json(product))
}

/// POST /api/products (admin)
pub async fn create_product(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&session, &state).await?;

    let new = validate_new_product(body)?;
    let product = state.store.create_product(new).await;

    tracing::info!("Product created: {} (id {})", product.name, product.id);

    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /api/products/{id} (admin)
pub async fn update_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<Json<Product>, ApiError> {
    require_admin(&session, &state).await?;

    let update = validate_product_update(body)?;
    let product = state
        .store
        .update_product(id, update)
        .await
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    Ok(Json(product))
}

/// DELETE /api/products/{id} (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_admin(&session, &state).await?;

    if !state.store.delete_product(id).await {
        return Err(ApiError::not_found("Product", id));
    }

    tracing::info!("Product deleted: id {}", id);

    Ok(StatusCode::OK)
}
