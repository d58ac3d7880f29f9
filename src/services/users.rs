//! User profile operations: view, update, delete (with story cascade), search.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::db::{CredentialStore, StoreError, StoryStore};
use crate::error::{AppError, AppResult};
use crate::models::{ProfileUpdate, PublicProfile, UserCredential};

#[derive(Clone)]
pub struct UserService {
    credentials: Arc<dyn CredentialStore>,
    stories: Arc<dyn StoryStore>,
}

fn user_not_found(e: StoreError) -> AppError {
    match e {
        StoreError::NotFound => AppError::UserNotFound,
        other => other.into(),
    }
}

impl UserService {
    pub fn new(credentials: Arc<dyn CredentialStore>, stories: Arc<dyn StoryStore>) -> Self {
        Self {
            credentials,
            stories,
        }
    }

    pub async fn profile(&self, id: Uuid) -> AppResult<PublicProfile> {
        let user = self
            .credentials
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        Ok(PublicProfile::from(&user))
    }

    pub async fn update(&self, id: Uuid, fields: ProfileUpdate) -> AppResult<UserCredential> {
        if fields.is_empty() {
            return Err(AppError::Validation("no profile fields to update".to_string()));
        }
        fields
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let user = self
            .credentials
            .update(id, fields)
            .await
            .map_err(user_not_found)?;
        info!(user_id = %id, "profile updated");
        Ok(user)
    }

    /// Delete the credential, then every story it authored. Postgres already
    /// cascades through `stories_author_id_fkey`, so there the second step
    /// removes nothing.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.credentials.delete(id).await.map_err(user_not_found)?;
        let removed = self.stories.delete_by_author(id).await?;
        info!(user_id = %id, stories_removed = removed, "user deleted");
        Ok(())
    }

    /// Pattern search over usernames. The pattern reaches the store unescaped.
    pub async fn search(&self, pattern: &str) -> AppResult<Vec<PublicProfile>> {
        let users = self.credentials.find_by_username_pattern(pattern).await?;
        Ok(users.iter().map(PublicProfile::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{NewCredential, NewStory};
    use chrono::Utc;

    async fn seeded() -> (UserService, MemoryStore, UserCredential) {
        let store = MemoryStore::new();
        let user = CredentialStore::insert(
            &store,
            NewCredential {
                id: Uuid::new_v4(),
                email: "a@x.com".to_string(),
                username: "alice".to_string(),
                password_hash: "hash".to_string(),
                name: "Alice".to_string(),
                bio: "hi".to_string(),
                avatar: "a.png".to_string(),
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();
        let service = UserService::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (service, store, user)
    }

    #[tokio::test]
    async fn profile_is_public_fields_only() {
        let (service, _, user) = seeded().await;
        let profile = service.profile(user.id).await.unwrap();
        assert_eq!(profile.id, user.id.to_string());
        assert_eq!(profile.avatar, "a.png");
        assert!(matches!(
            service.profile(Uuid::new_v4()).await,
            Err(AppError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn update_missing_user_is_user_not_found() {
        let (service, _, _) = seeded().await;
        let fields = ProfileUpdate {
            name: Some("x".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(Uuid::new_v4(), fields).await,
            Err(AppError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn update_rejects_invalid_email_and_keeps_the_old_one() {
        let (service, store, user) = seeded().await;
        for bad in ["", "not-an-email"] {
            let fields = ProfileUpdate {
                email: Some(bad.to_string()),
                ..Default::default()
            };
            assert!(matches!(
                service.update(user.id, fields).await,
                Err(AppError::Validation(_))
            ));
        }
        let stored = CredentialStore::find_by_id(&store, user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.email, "a@x.com");

        let fields = ProfileUpdate {
            email: Some("new@x.com".to_string()),
            ..Default::default()
        };
        assert_eq!(service.update(user.id, fields).await.unwrap().email, "new@x.com");
    }

    #[tokio::test]
    async fn delete_cascades_to_stories() {
        let (service, store, user) = seeded().await;
        StoryStore::insert(
            &store,
            NewStory {
                id: Uuid::new_v4(),
                author_id: user.id,
                title: "t".to_string(),
                body: String::new(),
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        service.delete(user.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            service.delete(user.id).await,
            Err(AppError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn search_matches_username_substring() {
        let (service, _, user) = seeded().await;
        let found = service.search("lic").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, user.id.to_string());
        assert!(service.search("zzz").await.unwrap().is_empty());
    }
}
