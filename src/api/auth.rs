use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::Value;
use tokio::task;
use tower_sessions::Session;

use super::validation::validate_credentials;
use super::{ApiError, AppState};
use crate::models::User;
use crate::services::credentials;

/// Session key holding the authenticated user's id.
const SESSION_USER_KEY: &str = "user_id";

// ============================================================================
// Authorization policy
// ============================================================================

/// Resolve the session to a user, if any. A cookie pointing at an evicted
/// session or a deleted user resolves to no identity, not an error.
async fn resolve_user(session: &Session, state: &AppState) -> Result<Option<User>, ApiError> {
    let user_id = session
        .get::<i32>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    match user_id {
        Some(id) => Ok(state.store.get_user(id).await),
        None => Ok(None),
    }
}

/// AuthenticatedUser requirement: 401 when no identity resolves.
pub async fn require_user(session: &Session, state: &AppState) -> Result<User, ApiError> {
    resolve_user(session, state)
        .await?
        .ok_or_else(ApiError::unauthorized)
}

/// Administrator requirement: 403 whether the caller is unauthenticated or
/// authenticated without the admin flag, matching the original contract.
pub async fn require_admin(session: &Session, state: &AppState) -> Result<User, ApiError> {
    match resolve_user(session, state).await? {
        Some(user) if user.is_admin => Ok(user),
        _ => Err(ApiError::forbidden()),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/register
/// Create an account and establish a session for it.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validate_credentials(body)?;

    if state
        .store
        .get_user_by_username(&payload.username)
        .await
        .is_some()
    {
        return Err(ApiError::validation("username", "Username already exists"));
    }

    let password = payload.password;
    let password_hash = task::spawn_blocking(move || credentials::hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(format!("Password hashing task panicked: {e}")))??;

    let user = state
        .store
        .create_user(payload.username, password_hash, false)
        .await;

    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("Registered user: {}", user.username);

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/login
/// Verify credentials and establish a session. A missing user and a wrong
/// password produce the same response, so usernames cannot be enumerated.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Value>,
) -> Result<Json<User>, ApiError> {
    let payload = validate_credentials(body)?;

    let Some(user) = state.store.get_user_by_username(&payload.username).await else {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    let password = payload.password;
    let stored = user.password.clone();
    let is_valid = task::spawn_blocking(move || credentials::verify_password(&password, &stored))
        .await
        .map_err(|e| ApiError::internal(format!("Password verification task panicked: {e}")))?;

    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(user))
}

/// POST /api/logout
/// Destroy the session. Idempotent: logging out twice is still a 200.
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /api/user
/// The currently authenticated user.
pub async fn current_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<User>, ApiError> {
    let user = require_user(&session, &state).await?;
    Ok(Json(user))
}
