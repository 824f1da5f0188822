use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Startup failure: required settings are missing or malformed.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

/// Document or blob store failure. Propagated as-is, never retried here.
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("{collection}/{key} not found")]
    NotFound { collection: String, key: String },
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<mongodb::error::Error> for DataAccessError {
    fn from(err: mongodb::error::Error) -> Self {
        DataAccessError::Backend(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account with this email already exists")]
    EmailTaken,
    #[error("Invalid session token")]
    InvalidToken,
    #[error("Session has ended, please sign in again")]
    SessionExpired,
    #[error("{0}")]
    Validation(String),
    #[error("Authentication service is unavailable")]
    Store(#[from] DataAccessError),
    #[error("Failed to process credentials")]
    Hashing,
}

/// Errors rendered at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DataAccessError> for ApiError {
    fn from(err: DataAccessError) -> Self {
        match err {
            DataAccessError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => {
                tracing::error!("Data access failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::SessionExpired => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::EmailTaken => ApiError::Conflict(err.to_string()),
            AuthError::Validation(msg) => ApiError::BadRequest(msg),
            AuthError::Store(inner) => {
                tracing::error!("Identity store failed: {}", inner);
                ApiError::Internal("Authentication service is unavailable".to_string())
            }
            AuthError::Hashing => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}
