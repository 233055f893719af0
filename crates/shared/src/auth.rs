//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token accepted by protected routes.
    Access,
    /// Long-lived token only accepted by the refresh endpoint.
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User's role (`admin` or `user`).
    pub role: String,
    /// Token kind.
    pub typ: TokenKind,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, typ: TokenKind, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_string(),
            typ,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Sign-up request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// User email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Admin request to create a user with a role.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// User email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Initial password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// `admin` or `user`; defaults to `user`.
    pub role: Option<String>,
}

/// Admin request to update a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name.
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    /// New email.
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,
    /// New role.
    pub role: Option<String>,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// User email.
    pub email: String,
    /// `admin` or `user`.
    pub role: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            name: "Somchai".into(),
            email: "somchai@example.com".into(),
            password: "longenough".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            name: String::new(),
            email: "nope".into(),
            password: "short".into(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_update_request_skips_absent_fields() {
        assert!(UpdateUserRequest::default().validate().is_ok());

        let bad = UpdateUserRequest {
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_token_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(TokenKind::Refresh).unwrap(),
            serde_json::json!("refresh")
        );
    }
}
