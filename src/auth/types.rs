//! Request bodies for the register and login flows.

use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Registration payload. Missing required fields deserialize as empty and
/// are rejected by validation.
#[derive(Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "username is required"))]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
}

impl RegisterRequest {
    /// Drop surrounding whitespace from the identifiers so a blank value
    /// fails the length check.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self.username = self.username.trim().to_string();
        self
    }
}

/// Login payload: `email` or `username`, plus `password`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIdentifier<'a> {
    Email(&'a str),
    Username(&'a str),
}

impl LoginRequest {
    /// Email wins when both are present.
    pub fn identifier(&self) -> AppResult<LoginIdentifier<'_>> {
        match (self.email.as_deref(), self.username.as_deref()) {
            (Some(email), _) => Ok(LoginIdentifier::Email(email)),
            (None, Some(username)) => Ok(LoginIdentifier::Username(username)),
            (None, None) => Err(AppError::Validation(
                "email or username is required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_requires_password() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@x.com","username":"alice"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_rejects_unknown_fields() {
        let res = serde_json::from_str::<RegisterRequest>(
            r#"{"email":"a@x.com","username":"alice","password":"pw","role":"admin"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn register_profile_fields_are_optional() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@x.com","username":"alice","password":"s3cret"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.bio.is_empty());
    }

    #[test]
    fn blank_username_fails_after_normalizing() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":" a@x.com ","username":"   ","password":"pw"}"#,
        )
        .unwrap();
        let req = req.normalized();
        assert_eq!(req.email, "a@x.com");
        assert!(req.username.is_empty());
        assert!(req.validate().is_err());
    }

    #[test]
    fn login_identifier_prefers_email() {
        let req: LoginRequest = serde_json::from_str(
            r#"{"email":"a@x.com","username":"alice","password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(req.identifier().unwrap(), LoginIdentifier::Email("a@x.com"));

        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"pw"}"#).unwrap();
        assert_eq!(req.identifier().unwrap(), LoginIdentifier::Username("alice"));
    }

    #[test]
    fn login_without_identifier_is_invalid() {
        let req: LoginRequest = serde_json::from_str(r#"{"password":"pw"}"#).unwrap();
        assert!(matches!(req.identifier(), Err(AppError::Validation(_))));
    }
}
