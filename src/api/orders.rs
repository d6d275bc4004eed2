use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::Value;
use tower_sessions::Session;

use super::auth::require_user;
use super::validation::validate_new_order;
use super::{ApiError, AppState};
use crate::models::Order;

/// POST /api/orders
/// Checkout: the client computes the total and the server stores it as
/// submitted. Stock is not decremented and the total is not verified against
/// cart contents. Clearing the cart afterwards is the client's job.
pub async fn create_order(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(&session, &state).await?;

    let new = validate_new_order(body)?;
    let order = state.store.create_order(user.id, new).await;

    tracing::info!("Order {} created for user {}", order.id, user.id);

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders
/// Only the session user's own orders are visible.
pub async fn list_orders(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Order>>, ApiError> {
    let user = require_user(&session, &state).await?;
    Ok(Json(state.store.orders_for_user(user.id).await))
}
