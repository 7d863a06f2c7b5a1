//! Handler error type and its JSON rendering.
//!
//! Every failure leaves the server as `{ "error": <message>, "code": <CODE> }`.
//! Internal details (IO paths, SQL text) are logged and replaced by a generic
//! message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portico_core::error::CoreError;
use portico_core::media::MediaError;
use portico_core::storage::StorageError;
use serde_json::json;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Malformed request that never reached the domain layer (missing form
    /// part, unreadable JSON payload, empty id list).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        AppError::Core(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Status, machine-readable code and client-facing message of one error.
struct Failure {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    /// Logs `detail` and hides it from the client.
    fn internal(detail: &dyn std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %detail, "{context}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", INTERNAL_MESSAGE)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let failure = match &self {
            AppError::Core(err) => core_failure(err),
            AppError::Database(err) => database_failure(err),
            AppError::Storage(err) => storage_failure(err),
            AppError::BadRequest(msg) => Failure::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => Failure::internal(msg, "Internal error"),
        };

        let body = json!({
            "error": failure.message,
            "code": failure.code,
        });
        (failure.status, Json(body)).into_response()
    }
}

fn core_failure(err: &CoreError) -> Failure {
    match err {
        CoreError::NotFound { entity, id } => {
            Failure::not_found(format!("{entity} with id {id} not found"))
        }
        CoreError::NotFoundByKey { entity, key } => {
            Failure::not_found(format!("{entity} '{key}' not found"))
        }
        CoreError::Validation(msg) => Failure::validation(msg),
        CoreError::Decode(msg) => Failure::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "DECODE_ERROR",
            format!("Uploaded file is not a valid image: {msg}"),
        ),
        CoreError::Conflict(msg) => Failure::conflict(msg),
        CoreError::Internal(msg) => Failure::internal(msg, "Internal core error"),
    }
}

fn storage_failure(err: &StorageError) -> Failure {
    match err {
        StorageError::NotFound(path) => Failure::not_found(format!("Stored file '{path}' not found")),
        StorageError::InvalidPath(path) => Failure::new(
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            format!("Invalid storage path '{path}'"),
        ),
        StorageError::Io(io) => Failure::internal(io, "Storage IO error"),
    }
}

/// Constraint violations become client errors; the schema names unique
/// constraints `uq_*`, so only those are reported as duplicates.
///
/// | SQLSTATE | Meaning | Response |
/// |---|---|---|
/// | `23505` on `uq_*` | duplicate name / slug | 409 `CONFLICT` |
/// | `23503` | missing parent, or a protected row still referenced | 409 `CONFLICT` |
/// | `23514` | check constraint | 400 `VALIDATION_ERROR` |
fn database_failure(err: &sqlx::Error) -> Failure {
    let db_err = match err {
        sqlx::Error::RowNotFound => return Failure::not_found("Resource not found"),
        sqlx::Error::Database(db_err) => db_err,
        other => return Failure::internal(other, "Database error"),
    };

    let constraint = db_err.constraint().unwrap_or("unknown");
    match db_err.code().as_deref() {
        Some("23505") if constraint.starts_with("uq_") => Failure::conflict(format!(
            "Duplicate value violates unique constraint: {constraint}"
        )),
        Some("23503") => Failure::conflict(format!(
            "Operation violates reference constraint: {constraint}"
        )),
        Some("23514") => {
            Failure::validation(format!("Value violates check constraint: {constraint}"))
        }
        _ => Failure::internal(db_err, "Database error"),
    }
}
