/// Error types for Blog Service
///
/// Every failure a handler can produce is an `AppError`. Errors are rendered as
/// `{"message": ..., "status": ...}` JSON bodies with the matching HTTP status.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

const FOLLOW_UNIQUE_CONSTRAINT: &str = "follows_user_following_unique";
const FOLLOW_SELF_CONSTRAINT: &str = "follows_no_self_follow";

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Request payload failed validation
    #[error("{0}")]
    Validation(String),

    /// `following` is missing or names no existing user
    #[error("Invalid data!")]
    InvalidFollowTarget,

    /// Caller tried to follow themselves
    #[error("You cannot follow yourself!")]
    SelfFollow,

    /// Caller already follows the target
    #[error("You are already following this author!")]
    AlreadyFollowing,

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed to touch this object
    #[error("{0}")]
    Forbidden(String),

    /// Duplicate resource (unique constraint)
    #[error("{0}")]
    Conflict(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(what: &str, id: i64) -> Self {
        AppError::NotFound(format!("{} {} not found", what, id))
    }

    pub fn authentication_required() -> Self {
        AppError::Unauthorized("Authentication credentials were not provided.".to_string())
    }

    /// Message exposed to API clients; server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::InvalidFollowTarget
            | AppError::SelfFollow
            | AppError::AlreadyFollowing => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "message": self.public_message(),
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.constraint() {
                Some(FOLLOW_UNIQUE_CONSTRAINT) => return AppError::AlreadyFollowing,
                Some(FOLLOW_SELF_CONSTRAINT) => return AppError::SelfFollow,
                _ => {}
            }
            if db_err.is_unique_violation() {
                return AppError::Conflict(db_err.message().to_string());
            }
        }

        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let detail = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, detail)
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
