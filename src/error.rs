//! Application error type and its HTTP mapping
//!
//! Domain and storage failures convert into [`Error`]; handlers return it and
//! axum renders it as `{"error": {"message", "type", "status"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for Evently operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Evently
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Field validation failures; the message lists the broken rules
    #[error("{0}")]
    Validation(String),

    #[error("Invalid date format")]
    InvalidDate,

    #[error("Invalid time format. Use HH:MM or HH:MM AM/PM")]
    InvalidTimeFormat,

    #[error("Invalid time values")]
    InvalidTimeValues,

    /// Another event already uses this slug
    #[error("An event with slug '{0}' already exists")]
    DuplicateSlug(String),

    /// Request body could not be decoded
    #[error("{0}")]
    BadRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn database<S: Into<String>>(msg: S) -> Self {
        Error::Database(msg.into())
    }

    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        Error::BadRequest(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::InvalidDate
            | Error::InvalidTimeFormat
            | Error::InvalidTimeValues
            | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateSlug(_) => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Error::Config(_)
            | Error::Database(_)
            | Error::Serialization(_)
            | Error::Io(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure is the caller's to fix
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server faults are reported generically
        let message = if status.is_server_error() {
            "An error occurred while processing the request".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "type": error_type(&self),
                "status": status.as_u16(),
            }
        }));

        match status {
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                tracing::error!(error = ?self, "Internal server error");
            },
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::CONFLICT => {
                tracing::warn!(error = %self, "Client error");
            },
            _ => {
                tracing::info!(error = ?self, "Request error");
            },
        }

        (status, body).into_response()
    }
}

/// Machine-readable `type` field of the error body
fn error_type(error: &Error) -> &'static str {
    match error {
        Error::Config(_) => "configuration_error",
        Error::Database(_) => "database_error",
        Error::Validation(_) => "validation_error",
        Error::InvalidDate => "invalid_date",
        Error::InvalidTimeFormat => "invalid_time_format",
        Error::InvalidTimeValues => "invalid_time_values",
        Error::DuplicateSlug(_) => "duplicate_slug",
        Error::BadRequest(_) => "bad_request",
        Error::Serialization(_) => "serialization_error",
        Error::Io(_) => "io_error",
        Error::Internal(_) => "internal_error",
        Error::NotFound(_) => "not_found",
        Error::Timeout(_) => "timeout",
    }
}

impl From<envconfig::Error> for Error {
    fn from(err: envconfig::Error) -> Self {
        Error::Config(err.to_string())
    }
}
