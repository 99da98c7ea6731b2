//! Client-related types shared between server and client
//!
//! Request/response bodies of the auth API.

use crate::validation::{
    MAX_EMAIL_LEN, MAX_PASSWORD_LEN, MAX_USERNAME_LEN, MIN_PASSWORD_LEN, MIN_USERNAME_LEN,
    validate_username,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Registration request; `password_confirm` must equal `password`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = MIN_USERNAME_LEN, max = MAX_USERNAME_LEN),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email, length(max = MAX_EMAIL_LEN))]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LEN, max = MAX_PASSWORD_LEN))]
    pub password: String,
    pub password_confirm: String,
}

/// User information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<crate::models::User> for UserInfo {
    fn from(user: crate::models::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: "someone@example.com".into(),
            password: password.into(),
            password_confirm: password.into(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("jdoe", "correct horse").validate().is_ok());

        let errors = register("jd", "correct horse").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));

        let errors = register("jdoe", "short").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let errors = register("j doe", "correct horse").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_register_password_length_bounds() {
        let at = |len: u64| register("jdoe", &"p".repeat(len as usize)).validate();

        assert!(at(MIN_PASSWORD_LEN).is_ok());
        assert!(at(MAX_PASSWORD_LEN).is_ok());
        assert!(at(MIN_PASSWORD_LEN - 1).is_err());
        assert!(at(MAX_PASSWORD_LEN + 1).is_err());
    }
}
