//! Error types for ideaboard.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Idea not found: {0}")]
    IdeaNotFound(String),

    #[error("Follow request not found: {0}")]
    FollowRequestNotFound(String),

    /// The actor is anonymous where an authenticated user is required.
    #[error("Authentication required")]
    Unauthorized,

    /// The actor is authenticated but is not the party allowed to act.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("A follow request between these users already exists")]
    DuplicateRequest,

    #[error("Follow request is no longer pending")]
    NotPending,

    #[error("Cannot follow yourself")]
    SelfFollow,

    #[error("Already following this user")]
    AlreadyFollowing,

    #[error("Not following this user")]
    NotFollowing,

    #[error("This user is not your follower")]
    NotFollower,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_)
            | Self::UserNotFound(_)
            | Self::IdeaNotFound(_)
            | Self::FollowRequestNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::SelfFollow
            | Self::NotFollowing
            | Self::NotFollower
            | Self::BadRequest(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateRequest
            | Self::NotPending
            | Self::AlreadyFollowing
            | Self::Conflict(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::IdeaNotFound(_) => "IDEA_NOT_FOUND",
            Self::FollowRequestNotFound(_) => "FOLLOW_REQUEST_NOT_FOUND",
            Self::Unauthorized => "UNAUTHENTICATED",
            Self::Forbidden(_) => "NOT_AUTHORIZED",
            Self::DuplicateRequest => "DUPLICATE_REQUEST",
            Self::NotPending => "NOT_PENDING",
            Self::SelfFollow => "SELF_FOLLOW",
            Self::AlreadyFollowing => "ALREADY_FOLLOWING",
            Self::NotFollowing => "NOT_FOLLOWING",
            Self::NotFollower => "NOT_FOLLOWER",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_graph_errors_are_client_errors() {
        for err in [
            AppError::DuplicateRequest,
            AppError::NotPending,
            AppError::SelfFollow,
            AppError::AlreadyFollowing,
            AppError::NotFollowing,
            AppError::NotFollower,
            AppError::Forbidden("not the target".to_string()),
            AppError::Unauthorized,
        ] {
            assert!(!err.is_server_error(), "{err} should be a client error");
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Forbidden(String::new()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::DuplicateRequest.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::FollowRequestNotFound("abc123".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotPending.error_code(), "NOT_PENDING");
        assert_eq!(AppError::Unauthorized.error_code(), "UNAUTHENTICATED");
        assert_eq!(
            AppError::Forbidden(String::new()).error_code(),
            "NOT_AUTHORIZED"
        );
    }
}
