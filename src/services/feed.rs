//! Story feed: list, fetch, publish.

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::db::{StoreError, StoryStore};
use crate::error::{AppError, AppResult};
use crate::models::{NewStory, Story};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateStoryRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Clone)]
pub struct FeedService {
    stories: Arc<dyn StoryStore>,
}

impl FeedService {
    pub fn new(stories: Arc<dyn StoryStore>) -> Self {
        Self { stories }
    }

    pub async fn list(&self) -> AppResult<Vec<Story>> {
        Ok(self.stories.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Story> {
        self.stories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Feed not found".to_string()))
    }

    pub async fn publish(&self, author_id: Uuid, req: CreateStoryRequest) -> AppResult<Story> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("title required".to_string()));
        }
        let story = self
            .stories
            .insert(NewStory {
                id: Uuid::new_v4(),
                author_id,
                title: title.to_string(),
                body: req.body,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::UserNotFound,
                other => other.into(),
            })?;
        info!(story_id = %story.id, author_id = %author_id, "story published");
        Ok(story)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CredentialStore, MemoryStore};
    use crate::models::NewCredential;

    fn feed() -> FeedService {
        FeedService::new(Arc::new(MemoryStore::new()))
    }

    async fn with_author() -> (FeedService, Uuid) {
        let store = MemoryStore::new();
        let author = CredentialStore::insert(
            &store,
            NewCredential {
                id: Uuid::new_v4(),
                email: "a@x.com".to_string(),
                username: "alice".to_string(),
                password_hash: "hash".to_string(),
                name: String::new(),
                bio: String::new(),
                avatar: String::new(),
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();
        (FeedService::new(Arc::new(store)), author.id)
    }

    #[tokio::test]
    async fn publish_then_get() {
        let (feed, author) = with_author().await;
        let story = feed
            .publish(
                author,
                CreateStoryRequest {
                    title: "  First  ".to_string(),
                    body: "hello".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(story.title, "First");
        assert_eq!(feed.get(story.id).await.unwrap(), story);
        assert_eq!(feed.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let req = CreateStoryRequest {
            title: "   ".to_string(),
            body: String::new(),
        };
        assert!(matches!(
            feed().publish(Uuid::new_v4(), req).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn publish_for_deleted_author_is_user_not_found() {
        let req = CreateStoryRequest {
            title: "orphan".to_string(),
            body: String::new(),
        };
        assert!(matches!(
            feed().publish(Uuid::new_v4(), req).await,
            Err(AppError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn missing_story_is_not_found() {
        assert!(matches!(
            feed().get(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
