//! In-process store for development and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, StoreError, StoryStore};
use crate::models::{NewCredential, NewStory, ProfileUpdate, Story, UserCredential};

/// Map-backed store. Uniqueness checks and inserts happen under one write
/// lock, so concurrent registrations cannot both claim an email.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, UserCredential>>>,
    stories: Arc<RwLock<Vec<Story>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_field(
    users: &HashMap<Uuid, UserCredential>,
    skip: Option<Uuid>,
    email: Option<&str>,
    username: Option<&str>,
) -> Option<&'static str> {
    users
        .values()
        .filter(|u| Some(u.id) != skip)
        .find_map(|u| {
            if email == Some(u.email.as_str()) {
                Some("email")
            } else if username == Some(u.username.as_str()) {
                Some("username")
            } else {
                None
            }
        })
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert(&self, credential: NewCredential) -> Result<UserCredential, StoreError> {
        let mut users = self.users.write().await;
        if let Some(field) = duplicate_field(
            &users,
            None,
            Some(credential.email.as_str()),
            Some(credential.username.as_str()),
        ) {
            return Err(StoreError::Duplicate(field.to_string()));
        }
        if users.contains_key(&credential.id) {
            return Err(StoreError::Duplicate("id".to_string()));
        }
        let user: UserCredential = credential.into();
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserCredential>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredential>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredential>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    /// Substring match; no regex support in memory.
    async fn find_by_username_pattern(
        &self,
        pattern: &str,
    ) -> Result<Vec<UserCredential>, StoreError> {
        let users = self.users.read().await;
        let mut found: Vec<UserCredential> = users
            .values()
            .filter(|u| u.username.contains(pattern))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(found)
    }

    async fn update(&self, id: Uuid, fields: ProfileUpdate) -> Result<UserCredential, StoreError> {
        let mut users = self.users.write().await;
        if let Some(email) = fields.email.as_deref() {
            if duplicate_field(&users, Some(id), Some(email), None).is_some() {
                return Err(StoreError::Duplicate("email".to_string()));
            }
        }
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        fields.apply(user);
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl StoryStore for MemoryStore {
    /// Like the Postgres foreign key, a story needs a live author.
    async fn insert(&self, story: NewStory) -> Result<Story, StoreError> {
        let users = self.users.read().await;
        if !users.contains_key(&story.author_id) {
            return Err(StoreError::NotFound);
        }
        let story: Story = story.into();
        self.stories.write().await.push(story.clone());
        Ok(story)
    }

    async fn list(&self) -> Result<Vec<Story>, StoreError> {
        let mut stories = self.stories.read().await.clone();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stories)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Story>, StoreError> {
        Ok(self.stories.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, StoreError> {
        let mut stories = self.stories.write().await;
        let before = stories.len();
        stories.retain(|s| s.author_id != author_id);
        Ok((before - stories.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_credential(email: &str, username: &str) -> NewCredential {
        NewCredential {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            name: String::new(),
            bio: String::new(),
            avatar: String::new(),
            created_at: Utc::now(),
        }
    }

    fn new_story(author_id: Uuid, title: &str) -> NewStory {
        NewStory {
            id: Uuid::new_v4(),
            author_id,
            title: title.to_string(),
            body: String::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email_and_username() {
        let store = MemoryStore::new();
        CredentialStore::insert(&store, new_credential("a@x.com", "alice"))
            .await
            .unwrap();

        let err = CredentialStore::insert(&store, new_credential("a@x.com", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref f) if f == "email"));

        let err = CredentialStore::insert(&store, new_credential("b@x.com", "alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref f) if f == "username"));
    }

    #[tokio::test]
    async fn lookups_return_none_when_missing() {
        let store = MemoryStore::new();
        assert!(store.find_by_email("ghost@x.com").await.unwrap().is_none());
        assert!(store.find_by_username("ghost").await.unwrap().is_none());
        assert!(CredentialStore::find_by_id(&store, Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn mutations_on_missing_user_are_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.update(id, ProfileUpdate::default()).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(store.delete(id).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn update_rejects_taken_email() {
        let store = MemoryStore::new();
        CredentialStore::insert(&store, new_credential("a@x.com", "alice"))
            .await
            .unwrap();
        let bob = CredentialStore::insert(&store, new_credential("b@x.com", "bob"))
            .await
            .unwrap();
        let fields = ProfileUpdate {
            email: Some("a@x.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(bob.id, fields).await,
            Err(StoreError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn username_pattern_is_case_sensitive_substring() {
        let store = MemoryStore::new();
        for (email, name) in [("1@x.com", "alice"), ("2@x.com", "malice"), ("3@x.com", "Alicia")] {
            CredentialStore::insert(&store, new_credential(email, name))
                .await
                .unwrap();
        }
        let found = store.find_by_username_pattern("lic").await.unwrap();
        let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["Alicia", "alice", "malice"]);

        let found = store.find_by_username_pattern("Ali").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn delete_by_author_removes_only_that_author() {
        let store = MemoryStore::new();
        let a = CredentialStore::insert(&store, new_credential("a@x.com", "alice"))
            .await
            .unwrap()
            .id;
        let b = CredentialStore::insert(&store, new_credential("b@x.com", "bob"))
            .await
            .unwrap()
            .id;
        StoryStore::insert(&store, new_story(a, "one")).await.unwrap();
        StoryStore::insert(&store, new_story(a, "two")).await.unwrap();
        StoryStore::insert(&store, new_story(b, "three")).await.unwrap();

        assert_eq!(store.delete_by_author(a).await.unwrap(), 2);
        let left = store.list().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].author_id, b);
    }

    #[tokio::test]
    async fn story_without_live_author_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            StoryStore::insert(&store, new_story(Uuid::new_v4(), "orphan")).await,
            Err(StoreError::NotFound)
        ));
        assert!(store.list().await.unwrap().is_empty());
    }
}
