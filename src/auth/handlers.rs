//! Auth HTTP handlers: register, login.

use axum::{extract::State, Json};
use serde::Serialize;

use super::types::{LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::UserResponse;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.auth().register(body).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user, token) = state.auth().login(body).await?;
    Ok(Json(LoginResponse {
        user: UserResponse::from(&user),
        token,
    }))
}
