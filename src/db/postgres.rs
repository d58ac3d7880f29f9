//! PostgreSQL-backed stores: users, stories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;
use uuid::Uuid;

use super::{CredentialStore, DbPool, StoreError, StoryStore};
use crate::models::{NewCredential, NewStory, ProfileUpdate, Story, UserCredential};

const USER_COLUMNS: &str = "id, email, username, password_hash, name, bio, avatar, created_at";
const STORY_COLUMNS: &str = "id, author_id, title, body, created_at";

// Postgres SQLSTATE for a malformed regular expression.
const INVALID_REGULAR_EXPRESSION: &str = "2201B";

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some("users_email_key") => "email",
                Some("users_username_key") => "username",
                _ => "unique field",
            };
            return StoreError::Duplicate(field.to_string());
        }
        // stories_author_id_fkey: the author row is gone.
        if db.is_foreign_key_violation() {
            return StoreError::NotFound;
        }
        if db.code().as_deref() == Some(INVALID_REGULAR_EXPRESSION) {
            return StoreError::InvalidPattern(db.message().to_string());
        }
    }
    StoreError::Unavailable(e.to_string())
}

// ---- User ----

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    name: String,
    bio: String,
    avatar: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserCredential {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            username: r.username,
            password_hash: r.password_hash,
            name: r.name,
            bio: r.bio,
            avatar: r.avatar,
            created_at: r.created_at,
        }
    }
}

impl PgStore {
    async fn find_user_where(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<UserCredential>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn insert(&self, c: NewCredential) -> Result<UserCredential, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, username, password_hash, name, bio, avatar, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(c.id)
            .bind(&c.email)
            .bind(&c.username)
            .bind(&c.password_hash)
            .bind(&c.name)
            .bind(&c.bio)
            .bind(&c.avatar)
            .bind(c.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserCredential>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredential>, StoreError> {
        self.find_user_where("email", email).await
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredential>, StoreError> {
        self.find_user_where("username", username).await
    }

    async fn find_by_username_pattern(
        &self,
        pattern: &str,
    ) -> Result<Vec<UserCredential>, StoreError> {
        let sql = format!(
            "SELECT {} FROM users WHERE username ~ $1 ORDER BY username",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, fields: ProfileUpdate) -> Result<UserCredential, StoreError> {
        let sql = format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                email = COALESCE($4, email),
                avatar = COALESCE($5, avatar)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(fields.name)
            .bind(fields.bio)
            .bind(fields.email)
            .bind(fields.avatar)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.map(Into::into).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let r = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if r.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        debug!(user_id = %id, "user row deleted");
        Ok(())
    }
}

// ---- Stories ----

#[derive(Debug, FromRow)]
struct StoryRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<StoryRow> for Story {
    fn from(r: StoryRow) -> Self {
        Self {
            id: r.id,
            author_id: r.author_id,
            title: r.title,
            body: r.body,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl StoryStore for PgStore {
    async fn insert(&self, s: NewStory) -> Result<Story, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO stories (id, author_id, title, body, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            STORY_COLUMNS
        );
        let row = sqlx::query_as::<_, StoryRow>(&sql)
            .bind(s.id)
            .bind(s.author_id)
            .bind(&s.title)
            .bind(&s.body)
            .bind(s.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Story>, StoreError> {
        let sql = format!(
            "SELECT {} FROM stories ORDER BY created_at DESC",
            STORY_COLUMNS
        );
        let rows = sqlx::query_as::<_, StoryRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Story>, StoreError> {
        let sql = format!("SELECT {} FROM stories WHERE id = $1", STORY_COLUMNS);
        let row = sqlx::query_as::<_, StoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(row.map(Into::into))
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, StoreError> {
        let r = sqlx::query("DELETE FROM stories WHERE author_id = $1")
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(r.rows_affected())
    }
}
