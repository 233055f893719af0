//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thbfx_core::auth::{Principal, Role};
use thbfx_shared::types::UserId;
use thbfx_shared::{AppError, TokenKind};
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(message: &str) -> Response {
    ApiError(AppError::Unauthorized(message.to_string())).into_response()
}

/// Authentication middleware that validates access tokens.
///
/// On success the typed [`Principal`] is stored in request extensions; the
/// role string in the token is parsed exactly once, here.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized("Authorization header with Bearer token is required");
    };

    let claims = match state.jwt_service.validate_token(token, TokenKind::Access) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Rejected access token");
            return ApiError::from(e).into_response();
        }
    };

    let Ok(role) = claims.role.parse::<Role>() else {
        debug!(role = %claims.role, "Rejected token with unknown role");
        return unauthorized("Invalid or malformed token");
    };

    request
        .extensions_mut()
        .insert(Principal::new(UserId::from_uuid(claims.sub), role));
    next.run(request).await
}

/// Rejects non-admin principals before the handler runs.
///
/// Must be layered inside [`auth_middleware`].
pub async fn require_admin(request: Request, next: Next) -> Response {
    match request.extensions().get::<Principal>() {
        Some(principal) if principal.is_admin() => next.run(request).await,
        Some(principal) => {
            debug!(user_id = %principal.id, "Non-admin refused admin route");
            ApiError(AppError::Forbidden("Admin access required".to_string())).into_response()
        }
        None => unauthorized("Authentication required"),
    }
}

/// Extractor for the authenticated principal.
///
/// ```ignore
/// async fn handler(AuthUser(principal): AuthUser) -> impl IntoResponse {
///     let user_id = principal.id;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("abc"), None);
    }
}
