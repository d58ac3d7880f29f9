//! Auth application service: registration and login.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::types::{LoginIdentifier, LoginRequest, RegisterRequest};
use super::{PasswordHasher, TokenIssuer};
use crate::db::CredentialStore;
use crate::error::{AppError, AppResult};
use crate::models::{NewCredential, UserCredential};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Validate, hash, and persist a new credential. Email or username
    /// collisions surface as `Conflict`.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<UserCredential> {
        let req = req.normalized();
        req.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let RegisterRequest {
            name,
            bio,
            email,
            password,
            username,
            avatar,
        } = req;

        let password_hash = self.hash_blocking(password).await?;
        let credential = NewCredential {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            name,
            bio,
            avatar,
            created_at: Utc::now(),
        };

        let user = self.store.insert(credential).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Look up by the single identifier given, verify the password, and mint
    /// a session token.
    pub async fn login(&self, req: LoginRequest) -> AppResult<(UserCredential, String)> {
        let found = match req.identifier()? {
            LoginIdentifier::Email(email) => self.store.find_by_email(email).await?,
            LoginIdentifier::Username(username) => self.store.find_by_username(username).await?,
        };
        let user = found.ok_or_else(|| {
            debug!("login rejected: unknown user");
            AppError::UserNotFound
        })?;

        if !self.verify_blocking(req.password, user.password_hash.clone()).await? {
            debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }

    async fn hash_blocking(&self, password: String) -> AppResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Hashing(format!("hash task: {}", e)))?
    }

    async fn verify_blocking(&self, password: String, hash: String) -> AppResult<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Hashing(format!("verify task: {}", e)))
    }
}
