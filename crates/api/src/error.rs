use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use innkeep_core::error::CoreError;
use serde::Serialize;

/// Error type returned by handlers and engine services.
///
/// Domain failures travel as [`CoreError`]; the remaining variants cover
/// storage and request-shape problems. Every variant renders as
/// `{"error": <message>, "code": <STABLE_CODE>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Message is logged, never sent to the client.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// The domain error inside, if any. Handy in tests.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            AppError::Core(core) => Some(core),
            _ => None,
        }
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// `Retry-After` hint, in seconds, on responses for retryable domain errors.
pub const RETRY_AFTER_SECS: u64 = 30;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Status, stable code, and client-facing message for an error.
type Rendered = (StatusCode, &'static str, String);

fn internal() -> Rendered {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

fn render_core(core: &CoreError) -> Rendered {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::InvalidDateRange(msg) => {
            (StatusCode::BAD_REQUEST, "INVALID_DATE_RANGE", msg.clone())
        }
        CoreError::RoomUnavailable { .. } => {
            (StatusCode::CONFLICT, "ROOM_UNAVAILABLE", core.to_string())
        }
        CoreError::RoomUnavailableExternal(reason) => (
            StatusCode::CONFLICT,
            "ROOM_UNAVAILABLE_EXTERNAL",
            format!("Room is not available: {reason}"),
        ),
        CoreError::AvailabilityCheckUnavailable(detail) => {
            tracing::warn!(error = %detail, "Availability check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "AVAILABILITY_CHECK_UNAVAILABLE",
                "Availability could not be confirmed. Please try again shortly.".to_string(),
            )
        }
        CoreError::InvalidOrExpiredOtp => (
            StatusCode::UNAUTHORIZED,
            "INVALID_OR_EXPIRED_OTP",
            core.to_string(),
        ),
        CoreError::TooManyRequests(msg) => {
            (StatusCode::TOO_MANY_REQUESTS, "TOO_MANY_REQUESTS", msg.clone())
        }
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Map storage errors onto responses.
///
/// `RowNotFound` is a 404. Named unique (`uq_`) and check (`ck_`)
/// constraint violations are 409. Anything else is a logged 500.
fn render_sqlx(err: &sqlx::Error) -> Rendered {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }

    if let sqlx::Error::Database(db_err) = err {
        let constraint = db_err.constraint().unwrap_or_default();
        let conflict = match db_err.code().as_deref() {
            Some("23505") if constraint.starts_with("uq_") => {
                Some(format!("Duplicate value violates unique constraint: {constraint}"))
            }
            Some("23514") if constraint.starts_with("ck_") => {
                tracing::warn!(constraint, "Check constraint rejected a write");
                Some(format!("Write violates constraint: {constraint}"))
            }
            _ => None,
        };
        if let Some(message) = conflict {
            return (StatusCode::CONFLICT, "CONFLICT", message);
        }
    }

    tracing::error!(error = %err, "Database error");
    internal()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = match &self {
            AppError::Core(core) => render_core(core),
            AppError::Database(err) => render_sqlx(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut response = (status, axum::Json(ErrorBody { error, code })).into_response();
        if self.as_core().is_some_and(CoreError::is_retryable) {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
        }
        response
    }
}
