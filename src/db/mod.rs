//! Record store layer: credential and story stores, PostgreSQL and in-memory backends.

mod memory;
mod pool;
mod postgres;

pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DbPool};
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewCredential, NewStory, ProfileUpdate, Story, UserCredential};

/// Store-level failures. Not-found on a single-record lookup is `Ok(None)`,
/// not an error; `NotFound` is only returned by mutations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate value for {0}")]
    Duplicate(String),
    #[error("record not found")]
    NotFound,
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// User credential persistence. Implementations enforce email and username
/// uniqueness themselves.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn insert(&self, credential: NewCredential) -> Result<UserCredential, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserCredential>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredential>, StoreError>;

    async fn find_by_username(&self, username: &str)
        -> Result<Option<UserCredential>, StoreError>;

    /// Case-sensitive match of `pattern` against usernames, with the store's
    /// own matching semantics. The pattern is not escaped.
    async fn find_by_username_pattern(
        &self,
        pattern: &str,
    ) -> Result<Vec<UserCredential>, StoreError>;

    async fn update(&self, id: Uuid, fields: ProfileUpdate) -> Result<UserCredential, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Story persistence for the feed.
#[async_trait]
pub trait StoryStore: Send + Sync {
    async fn insert(&self, story: NewStory) -> Result<Story, StoreError>;

    /// All stories, newest first.
    async fn list(&self) -> Result<Vec<Story>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Story>, StoreError>;

    /// Remove every story by `author_id`; returns how many were removed.
    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, StoreError>;
}
