//! Application error taxonomy and its HTTP mapping.
//!
//! Every failure the service can report is one variant of [`AppError`].
//! Handlers return `Result<_, AppError>` and the [`IntoResponse`] impl maps
//! each variant to exactly one status code and a stable machine-readable token.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::code_generator::CodeGenError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("url not found")]
    NotFound { code: String },

    #[error("url has expired")]
    Expired { code: String },

    #[error("invalid url")]
    InvalidUrl,

    #[error("invalid short code")]
    InvalidShortCode,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("short code already exists")]
    AlreadyExists,

    #[error("failed to generate unique short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("storage unavailable")]
    Unavailable,

    /// Detail is kept for logs only and never serialized.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn expired(code: impl Into<String>) -> Self {
        Self::Expired { code: code.into() }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Expired { .. } => StatusCode::GONE,
            AppError::InvalidUrl | AppError::InvalidShortCode | AppError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::AlreadyExists => StatusCode::CONFLICT,
            AppError::GenerationExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into the client-facing payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::NotFound { code } => (
                "not_found",
                "url not found".to_string(),
                json!({ "short_code": code }),
            ),
            AppError::Expired { code } => (
                "expired",
                "url has expired".to_string(),
                json!({ "short_code": code }),
            ),
            AppError::InvalidUrl => ("invalid_url", "invalid url".to_string(), Value::Null),
            AppError::InvalidShortCode => (
                "invalid_short_code",
                "invalid short code".to_string(),
                Value::Null,
            ),
            AppError::InvalidRequest(reason) => {
                ("invalid_request", reason.clone(), Value::Null)
            }
            AppError::AlreadyExists => (
                "already_exists",
                "short code already exists".to_string(),
                Value::Null,
            ),
            AppError::GenerationExhausted { attempts } => (
                "generation_exhausted",
                "failed to generate a unique short code".to_string(),
                json!({ "attempts": attempts }),
            ),
            AppError::Unavailable => (
                "unavailable",
                "storage is temporarily unavailable".to_string(),
                Value::Null,
            ),
            AppError::Internal(_) => (
                "internal_error",
                "internal server error".to_string(),
                Value::Null,
            ),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!(error = %detail, "request failed with internal error");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<CodeGenError> for AppError {
    fn from(e: CodeGenError) -> Self {
        AppError::internal(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::invalid_request(e.to_string())
    }
}

/// Postgres SQLSTATE raised when `statement_timeout` cancels a query.
const QUERY_CANCELED: &str = "57014";

/// Translates a driver error into the domain taxonomy.
///
/// Uniqueness violations become [`AppError::AlreadyExists`]; connectivity
/// problems and statement timeouts become [`AppError::Unavailable`].
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::AlreadyExists;
        }
        if db.code().as_deref() == Some(QUERY_CANCELED) {
            tracing::warn!(error = %e, "statement timed out");
            return AppError::Unavailable;
        }
    }

    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => {
            tracing::warn!(error = %e, "database unreachable");
            AppError::Unavailable
        }
        other => AppError::internal(format!("database error: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::expired("x").status_code(), StatusCode::GONE);
        assert_eq!(AppError::InvalidUrl.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InvalidShortCode.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::AlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::GenerationExhausted { attempts: 10 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Unavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_internal_detail_is_not_disclosed() {
        let info = AppError::internal("connection refused on 10.0.0.5").to_error_info();

        assert_eq!(info.code, "internal_error");
        assert_eq!(info.message, "internal server error");
        assert!(info.details.is_null());
    }

    #[test]
    fn test_not_found_carries_code() {
        let info = AppError::not_found("abc1234").to_error_info();

        assert_eq!(info.code, "not_found");
        assert_eq!(info.details["short_code"], "abc1234");
    }

    #[test]
    fn test_pool_timeout_maps_to_unavailable() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Unavailable));
    }

    #[test]
    fn test_row_not_found_maps_to_internal() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::AlreadyExists.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
