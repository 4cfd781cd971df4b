//! Typed errors per layer and the single HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by stores. This is the lowest-level kind and is preserved by
/// the service layer so handlers can match on it.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("resource not found")]
    NotFound,
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),
    #[error("still referenced: {0}")]
    Referenced(String),
    #[error("storage: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("storage inconsistency: {0}")]
    Inconsistent(String),
}

impl StoreError {
    /// Classify a write failure: unique and foreign-key violations get their own kinds.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::DuplicateEntry(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::Referenced(db_err.message().to_string());
            }
        }
        StoreError::Storage(err)
    }
}

/// Store error with service-level context. `kind()` exposes the original store error.
#[derive(Error, Debug)]
#[error("{context}: {source}")]
pub struct ServiceError {
    context: String,
    #[source]
    source: StoreError,
}

impl ServiceError {
    pub fn new(context: impl Into<String>, source: StoreError) -> Self {
        ServiceError {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> &StoreError {
        &self.source
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.source, StoreError::NotFound)
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self.source, StoreError::DuplicateEntry(_))
    }
}

/// Attach context to a store result.
pub trait Context<T> {
    fn context(self, context: impl Into<String>) -> Result<T, ServiceError>;

    fn with_context<F, C>(self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> Context<T> for Result<T, StoreError> {
    fn context(self, context: impl Into<String>) -> Result<T, ServiceError> {
        self.map_err(|e| ServiceError::new(context, e))
    }

    fn with_context<F, C>(self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| ServiceError::new(f(), e))
    }
}

/// A query parameter whose value cannot be converted to the filter's declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value '{value}' for query parameter '{field}': expected {expected}")]
pub struct ParseError {
    pub field: String,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("config: {0}")]
    Validation(String),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid query parameters: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) | AppError::Parse(_) => StatusCode::BAD_REQUEST,
            AppError::Service(e) => match e.kind() {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::DuplicateEntry(_) | StoreError::Referenced(_) => StatusCode::CONFLICT,
                StoreError::Storage(_) | StoreError::Inconsistent(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, details) = match self {
            AppError::Validation(fields) => ("validation failed".to_string(), Some(fields)),
            AppError::BadRequest(msg) => (msg, None),
            AppError::Parse(e) => (format!("invalid query parameters: {}", e), None),
            AppError::Service(e) => {
                if status.is_server_error() {
                    tracing::error!(error = %e, "request failed");
                    ("Internal Server Error".to_string(), None)
                } else {
                    (e.to_string(), None)
                }
            }
        };
        let body = ErrorBody {
            status: status.as_u16(),
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}
