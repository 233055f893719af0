//! Mapping of application errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::{Value, json};
use thbfx_core::auth::AccessError;
use thbfx_db::{TransactionError, UserError};
use thbfx_shared::{AppError, FieldErrors, JwtError};
use tracing::error;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An [`AppError`] on its way to becoming a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Builds the JSON body sent to the client.
    fn body(&self) -> Value {
        let err = &self.0;
        if err.is_server_error() {
            return json!({
                "error": err.error_code(),
                "message": "An internal error occurred",
            });
        }

        match err {
            AppError::InvalidInput(details) => json!({
                "error": err.error_code(),
                "message": "Validation failed",
                "details": details,
            }),
            AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::NotFound(message)
            | AppError::Validation(message)
            | AppError::Conflict(message) => json!({
                "error": err.error_code(),
                "message": message,
            }),
            _ => json!({ "error": err.error_code(), "message": err.to_string() }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        }

        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body())).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self(AppError::InvalidInput(errors))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self(errors.into())
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        Self(err.into())
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(_) => {
                Self(AppError::NotFound("Transaction not found".to_string()))
            }
            TransactionError::Database(e) => e.into(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => Self(AppError::NotFound("User not found".to_string())),
            UserError::EmailTaken => Self(AppError::Conflict(err.to_string())),
            UserError::HasTransactions(_) => Self(AppError::Conflict(
                "Cannot delete a user who still owns transactions".to_string(),
            )),
            UserError::Database(e) => e.into(),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self(AppError::Unauthorized("Token has expired".to_string())),
            JwtError::WrongKind => Self(AppError::Unauthorized("Invalid token type".to_string())),
            JwtError::DecodingError(_) => {
                Self(AppError::Unauthorized("Invalid or malformed token".to_string()))
            }
            JwtError::EncodingError(e) => Self(AppError::Internal(e)),
        }
    }
}
