use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tower_sessions::Session;

use super::auth::require_user;
use super::validation::{validate_cart_item_update, validate_new_cart_item};
use super::{ApiError, AppState};
use crate::models::CartItem;

/// GET /api/cart
/// Only the session user's own items are visible.
pub async fn list_cart(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<CartItem>>, ApiError> {
    let user = require_user(&session, &state).await?;
    Ok(Json(state.store.cart_items_for_user(user.id).await))
}

/// POST /api/cart
/// The owning user always comes from the session; a userId in the body is
/// ignored. The referenced product is not checked for existence, matching
/// the store's no-referential-integrity contract.
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(&session, &state).await?;

    let new = validate_new_cart_item(body)?;
    let item = state.store.add_cart_item(user.id, new).await;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/cart/{id}
pub async fn update_cart_item(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<Json<CartItem>, ApiError> {
    require_user(&session, &state).await?;

    let update = validate_cart_item_update(body)?;
    let item = state
        .store
        .update_cart_item(id, update.quantity)
        .await
        .ok_or_else(|| ApiError::not_found("Cart item", id))?;

    Ok(Json(item))
}

/// DELETE /api/cart/{id}
pub async fn remove_cart_item(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_user(&session, &state).await?;

    if !state.store.remove_cart_item(id).await {
        return Err(ApiError::not_found("Cart item", id));
    }

    Ok(StatusCode::OK)
}
