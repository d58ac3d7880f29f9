//! Shared application state and health.

use axum::{http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

use crate::auth::{AuthService, PasswordHasher, TokenIssuer};
use crate::db::{CredentialStore, StoryStore};
use crate::services::{FeedService, UserService};

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub users: UserService,
    pub feed: FeedService,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        stories: Arc<dyn StoryStore>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            auth: AuthService::new(credentials.clone(), hasher, tokens.clone()),
            users: UserService::new(credentials, stories.clone()),
            feed: FeedService::new(stories),
            tokens,
        }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
    pub fn users(&self) -> &UserService {
        &self.users
    }
    pub fn feed(&self) -> &FeedService {
        &self.feed
    }
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}

/// GET /health — liveness check.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "storyfeed" })),
    )
}
