use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gatehouse_core::AccountError;
use std::fmt;

use crate::api_types::ApiResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::error(self.message));
        (self.status, body).into_response()
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::EmailConflict | AccountError::EmailNotFound => {
                Self::conflict(err.to_string())
            }
            AccountError::InvalidCredentials
            | AccountError::InvalidToken
            | AccountError::Unauthenticated => {
                Self::unauthorized(err.to_string())
            }
            AccountError::InsufficientRole
            | AccountError::RoleMutationForbidden => {
                Self::forbidden(err.to_string())
            }
            AccountError::UserNotFound => Self::not_found(err.to_string()),
            AccountError::Store(inner) => {
                tracing::error!(error = %inner, "user store failure");
                Self::internal("internal server error")
            }
            AccountError::Internal(inner) => {
                tracing::error!(error = %inner, "internal failure");
                Self::internal("internal server error")
            }
        }
    }
}
