//! Feed handlers. All routes require a session token.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::AuthUser;
use crate::models::Story;
use crate::services::CreateStoryRequest;

/// GET /feeds
pub async fn list_feeds(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> Result<Json<Vec<Story>>, AppError> {
    Ok(Json(state.feed().list().await?))
}

/// GET /feeds/:id
pub async fn get_feed(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Story>, AppError> {
    Ok(Json(state.feed().get(id).await?))
}

/// POST /feeds — publish a story as the caller.
pub async fn create_feed(
    State(state): State<AppState>,
    AuthUser(author_id): AuthUser,
    Json(body): Json<CreateStoryRequest>,
) -> Result<Json<Story>, AppError> {
    Ok(Json(state.feed().publish(author_id, body).await?))
}
