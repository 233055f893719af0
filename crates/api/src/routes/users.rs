//! Admin user-management routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::json;
use thbfx_core::auth::{Role, hash_password};
use thbfx_db::{UserRepository, UserUpdate, UserWithTransactionCount};
use thbfx_shared::AppError;
use thbfx_shared::auth::{CreateUserRequest, UpdateUserRequest};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    middleware::AuthUser,
    routes::auth::{normalize_email, user_info},
};

/// Creates the admin routes (requires auth and admin middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route(
            "/admin/users/{id}",
            put(update_user).delete(delete_user),
        )
}

/// A user row in the admin listing.
#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// `admin` or `user`.
    pub role: Role,
    /// Created timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Number of transactions the user created.
    pub transaction_count: u64,
}

impl From<UserWithTransactionCount> for AdminUserResponse {
    fn from(row: UserWithTransactionCount) -> Self {
        Self {
            id: row.user.id,
            name: row.user.name,
            email: row.user.email,
            role: row.user.role.into(),
            created_at: row.user.created_at,
            transaction_count: row.transaction_count,
        }
    }
}

fn parse_role(value: &str) -> Result<Role, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::invalid_field("role", "Role must be admin or user"))
}

/// GET `/admin/users` - Every user with a transaction count.
async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = UserRepository::new((*state.db).clone())
        .list_with_transaction_counts()
        .await?;
    let data: Vec<AdminUserResponse> = users.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "data": data })))
}

/// POST `/admin/users` - Create a user with any role.
async fn create_user(
    State(state): State<AppState>,
    AuthUser(admin): AuthUser,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    let role = payload
        .role
        .as_deref()
        .map(parse_role)
        .transpose()?
        .unwrap_or_default();

    let user_repo = UserRepository::new((*state.db).clone());
    let email = normalize_email(&payload.email);
    if user_repo.email_exists(&email).await? {
        return Err(
            AppError::Conflict("An account with this email already exists".to_string()).into(),
        );
    }

    let password_hash =
        hash_password(&payload.password).map_err(|e| AppError::Internal(e.to_string()))?;
    let user = user_repo
        .create(payload.name.trim(), &email, &password_hash, role)
        .await?;

    info!(admin_id = %admin.id, user_id = %user.id, "Admin created user");

    Ok((StatusCode::CREATED, Json(json!({ "data": user_info(user) }))))
}

/// PUT `/admin/users/{id}` - Change name, email or role.
async fn update_user(
    State(state): State<AppState>,
    AuthUser(admin): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;

    let update = UserUpdate {
        name: payload.name.as_deref().map(|n| n.trim().to_string()),
        email: payload.email.as_deref().map(normalize_email),
        role: payload.role.as_deref().map(parse_role).transpose()?,
    };

    let user = UserRepository::new((*state.db).clone())
        .update(id, update)
        .await?;

    info!(admin_id = %admin.id, user_id = %id, "Admin updated user");

    Ok(Json(json!({ "data": user_info(user) })))
}

/// DELETE `/admin/users/{id}` - Remove a user who owns no transactions.
async fn delete_user(
    State(state): State<AppState>,
    AuthUser(admin): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if admin.id.into_inner() == id {
        return Err(AppError::Validation("You cannot delete your own account".to_string()).into());
    }

    UserRepository::new((*state.db).clone()).delete(id).await?;

    info!(admin_id = %admin.id, user_id = %id, "Admin deleted user");

    Ok(Json(json!({ "message": "User deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("admin").unwrap(), Role::Admin);
        assert_eq!(parse_role(" user ").unwrap(), Role::StandardUser);
        assert!(matches!(
            parse_role("superuser"),
            Err(AppError::InvalidInput(errors)) if errors.contains("role")
        ));
    }
}
