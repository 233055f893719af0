//! Authentication routes for login, register, token refresh and the current user.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}};
use serde_json::json;
use thbfx_core::auth::{Role, hash_password, verify_password_or_dummy};
use thbfx_db::{UserRepository, entities::users};
use thbfx_shared::auth::{LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, UserInfo};
use thbfx_shared::{AppError, TokenKind};
use tracing::info;
use validator::Validate;

use crate::{AppState, error::ApiResult, extract::ApiJson, middleware::AuthUser};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
}

/// Auth routes that need an access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// Lower-cased, trimmed email used for storage and lookup.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        name: user.name,
        email: user.email,
        role: Role::from(user.role).to_string(),
    }
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo.find_by_email(&normalize_email(&payload.email)).await?;

    let verified = verify_password_or_dummy(
        &payload.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    );
    let Some(user) = user.filter(|_| verified) else {
        info!("Failed login attempt");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
    };

    let role = Role::from(user.role);
    let access_token = state.jwt_service.generate_access_token(user.id, role.as_str())?;
    let refresh_token = state.jwt_service.generate_refresh_token(user.id, role.as_str())?;

    info!(user_id = %user.id, "User logged in successfully");

    Ok(Json(LoginResponse {
        user: user_info(user),
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}

/// POST /auth/register - Register a new standard user.
async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;

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
        .create(payload.name.trim(), &email, &password_hash, Role::StandardUser)
        .await?;

    info!(user_id = %user.id, "New user registered");

    Ok((StatusCode::CREATED, Json(json!({ "data": user_info(user) }))))
}

/// POST /auth/refresh - Issue a new access token from a refresh token.
///
/// The role is re-read from storage so a role change applies from here on.
async fn refresh(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> ApiResult<impl IntoResponse> {
    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token, TokenKind::Refresh)?;

    let user = UserRepository::new((*state.db).clone())
        .find_by_id(claims.user_id())
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    let role = Role::from(user.role);
    let access_token = state.jwt_service.generate_access_token(user.id, role.as_str())?;

    Ok(Json(json!({
        "access_token": access_token,
        "expires_in": state.jwt_service.access_token_expires_in(),
    })))
}

/// GET /auth/me - The authenticated user's record.
async fn me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<impl IntoResponse> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(principal.id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "data": user_info(user) })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@Currency.Local "), "admin@currency.local");
    }
}
