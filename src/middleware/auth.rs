//! Auth middleware: session token extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::http::AppState;

/// Extractor: authenticated user ID from the session token (Bearer).
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub Uuid);

impl AuthUser {
    /// Only the account owner may act on `id`.
    pub fn require_self(&self, id: Uuid) -> AppResult<()> {
        if self.0 != id {
            debug!(caller = %self.0, target = %id, "rejected cross-user request");
            return Err(AppError::Forbidden(
                "cannot modify another user's account".to_string(),
            ));
        }
        Ok(())
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::MissingToken)?;
        let user_id = state.tokens().verify(bearer.token()).map_err(|e| {
            debug!(error = %e, "rejected session token");
            AppError::Token(e)
        })?;
        Ok(AuthUser(user_id))
    }
}
