//! Error types for the MediBuddy server.
//!
//! Every service returns an [`AppError`]; the `IntoResponse` impl maps it to
//! an HTTP status and a small JSON body. Variants that describe server-side
//! faults are logged with full detail and answered with a generic message, so
//! upstream payloads and database errors never reach the caller.

use axum::{
    extract::rejection::JsonRejection,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or semantically invalid request body.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad credentials, missing token, invalid signature or expired token.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Resource absent or not owned by the caller.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Duplicate resource (e.g. an email that is already registered).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Retrieval or generation service unreachable, timed out or unparsable.
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// Store read/write failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_)
            | AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to show to the caller.
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Upstream(_) => "Upstream service unavailable".to_string(),
            AppError::Database(_)
            | AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => tracing::error!(error = %e, "Database error"),
            AppError::Serialization(e) => tracing::error!(error = %e, "Serialization error"),
            AppError::Config(msg) => tracing::error!(error = %msg, "Configuration error"),
            AppError::Internal(msg) => tracing::error!(error = %msg, "Internal error"),
            AppError::Upstream(msg) => tracing::warn!(error = %msg, "Upstream service error"),
            AppError::Auth(msg) => tracing::debug!(reason = %msg, "Request rejected as unauthorized"),
            AppError::Validation(_) | AppError::NotFound(_) | AppError::Conflict(_) => {}
        }

        let status = self.status_code();
        let body = Json(json!({
            "error": self.public_message(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<envy::Error> for AppError {
    fn from(err: envy::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request payload: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(format!("Failed to parse form: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_not_found_error() {
        let err = AppError::NotFound("Health record not found".to_string());
        assert_eq!(err.to_string(), "Resource not found: Health record not found");
    }

    #[test]
    fn test_validation_error() {
        let err = AppError::Validation("Invalid email".to_string());
        assert_eq!(err.to_string(), "Validation error: Invalid email");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Auth(String::new()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound(String::new()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict(String::new()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Upstream(String::new()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_upstream_detail_is_not_leaked() {
        let err = AppError::Upstream("retrieval returned {\"secret\":\"payload\"}".to_string());
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Upstream service unavailable");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_database_detail_is_not_leaked() {
        let err = AppError::Database(sqlx::Error::Protocol("relation users missing".to_string()));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["status"], 500);
    }

    #[tokio::test]
    async fn test_client_errors_keep_message() {
        let (status, body) = body_json(AppError::Auth("Invalid email or password".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }
}
