use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Crate-wide error taxonomy. `Validation`, `Conflict` and `NotFound` are
/// expected, caller-recoverable outcomes; `Unavailable` and `Internal` are
/// logged with context and surfaced as opaque messages.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Service unavailable")]
    Unavailable,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(json!({
            "error": true,
            "message": self.to_string(),
            "status_code": status.as_u16(),
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }
}

/// Unique-index violations are the authoritative conflict signal; any
/// pre-check in the stores only exists for friendlier messages. The violated
/// column is taken from the constraint message to phrase the response, the
/// classification itself relies on the structured error kind.
impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found"),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ApiError::conflict(conflict_message(db_err.message()))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                error!(error = %e, "storage unavailable");
                ApiError::Unavailable
            }
            _ => {
                error!(error = %e, "unexpected database error");
                ApiError::Internal
            }
        }
    }
}

fn conflict_message(constraint: &str) -> String {
    let field = if constraint.contains("employees.employee_id") {
        Some("Employee ID")
    } else if constraint.contains("employees.email") {
        Some("Email")
    } else if constraint.contains("attendance.employee_id") {
        Some("Attendance for this employee and date")
    } else {
        None
    };
    match field {
        Some(f) => format!("{} already exists", f),
        None => "Duplicate entry detected".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::validation("email", "invalid").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::conflict("dup").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("missing").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Unavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_message_names_the_field() {
        let err = ApiError::validation("hire_date", "must be in YYYY-MM-DD format");
        assert_eq!(err.to_string(), "hire_date: must be in YYYY-MM-DD format");
    }

    #[test]
    fn conflict_message_identifies_violated_column() {
        assert_eq!(
            conflict_message("UNIQUE constraint failed: employees.email"),
            "Email already exists"
        );
        assert_eq!(
            conflict_message("UNIQUE constraint failed: employees.employee_id"),
            "Employee ID already exists"
        );
        assert_eq!(
            conflict_message("UNIQUE constraint failed: something.else"),
            "Duplicate entry detected"
        );
    }
}
