//! User profile handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::AuthUser;
use crate::models::{ProfileUpdate, PublicProfile};

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfile>, AppError> {
    Ok(Json(state.users().profile(id).await?))
}

/// PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<Value>, AppError> {
    caller.require_self(id)?;
    state.users().update(id, body).await?;
    Ok(Json(json!({ "message": "Updated user successfully." })))
}

/// DELETE /users/:id — also removes the user's stories.
pub async fn delete_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    caller.require_self(id)?;
    state.users().delete(id).await?;
    Ok(Json(json!({ "message": "Removed user successfully." })))
}

/// GET /users/search/:username
pub async fn search_users(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
) -> Result<Json<Vec<PublicProfile>>, AppError> {
    Ok(Json(state.users().search(&pattern).await?))
}
