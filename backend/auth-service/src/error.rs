use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::UserRole;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed token claims")]
    MalformedClaims,

    #[error("Token expired")]
    Expired,

    #[error("Wrong token type, expected {expected}")]
    WrongTokenType { expected: &'static str },

    #[error("Token has been revoked")]
    Revoked,

    #[error("Token subject no longer exists")]
    UnknownSubject,

    #[error("User not found")]
    NotFound,

    #[error("Account is inactive")]
    InactiveAccount,

    #[error("Invalid credentials")]
    BadCredentials,

    #[error("Insufficient permissions, requires one of {required:?}")]
    InsufficientRole { required: Vec<UserRole> },

    #[error("Too many requests")]
    TooManyRequests,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidSignature
            | AuthError::MalformedClaims
            | AuthError::Expired
            | AuthError::WrongTokenType { .. }
            | AuthError::Revoked
            | AuthError::UnknownSubject
            | AuthError::NotFound
            | AuthError::InactiveAccount
            | AuthError::BadCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole { .. } => StatusCode::FORBIDDEN,
            AuthError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Login failures share one message so the response never reveals
        // whether the email or the password was wrong.
        let error_message = match &self {
            AuthError::BadCredentials | AuthError::NotFound => {
                "Invalid email or password".to_string()
            }
            AuthError::InsufficientRole { .. } => "Insufficient permissions".to_string(),
            AuthError::TooManyRequests => "Too many requests".to_string(),
            AuthError::Database(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
    }
}
