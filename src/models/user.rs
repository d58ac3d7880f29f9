//! User credential record and the response shapes derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stored user identity, including the password hash.
///
/// Deliberately not `Serialize`: responses go through [`UserResponse`] or
/// [`PublicProfile`], neither of which carries the hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub bio: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a credential about to be inserted.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub bio: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

impl From<NewCredential> for UserCredential {
    fn from(n: NewCredential) -> Self {
        Self {
            id: n.id,
            email: n.email,
            username: n.username,
            password_hash: n.password_hash,
            name: n.name,
            bio: n.bio,
            avatar: n.avatar,
            created_at: n.created_at,
        }
    }
}

/// Profile fields that may change after registration. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    #[validate(email(message = "a valid email is required"))]
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.email.is_none() && self.avatar.is_none()
    }

    /// Apply to a stored credential in place.
    pub fn apply(self, user: &mut UserCredential) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
    }
}

/// Account view returned to the account owner (register, login).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub avatar: String,
    pub created_at: String,
}

impl From<&UserCredential> for UserResponse {
    fn from(user: &UserCredential) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Public profile: no email, no password material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicProfile {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub avatar: String,
}

impl From<&UserCredential> for PublicProfile {
    fn from(user: &UserCredential) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
        }
    }
}
