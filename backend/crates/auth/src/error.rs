//! Auth Error Types
//!
//! Typed failures of the session lifecycle. They are returned, never
//! panicked, and converted into `kernel::error::AppError` only at the
//! boundary layer.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown login or wrong password; never distinguished to the caller
    #[error("Invalid login or password")]
    InvalidCredentials,

    /// Registration with a login that is already taken
    #[error("User already exists")]
    AlreadyExists,

    /// Login attempted while a session is active
    #[error("User is already logged in")]
    AlreadyLoggedIn,

    /// Logout attempted while no session is active
    #[error("User is already logged out")]
    AlreadyLoggedOut,

    /// Refresh token invalid, expired or superseded
    #[error("Refresh token expired")]
    Expired,

    /// Access token carries no recoverable identity
    #[error("Unauthorized")]
    Unauthorized,

    /// Token is well-formed but the session was logged out server-side
    #[error("User is logged out")]
    UserIsUnlogged,

    /// Referenced user ID is absent from the session store
    #[error("User not found")]
    NotFound,

    /// Login rejected at registration
    #[error("Invalid login: {0}")]
    InvalidLogin(String),

    /// Password rejected at registration
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// A registration failed half-way and the compensating delete failed
    /// too. The session store now holds a user without a credential.
    #[error("Compensation failed for user {user_id}: {source}")]
    CompensationFailed {
        user_id: String,
        #[source]
        source: Box<AuthError>,
    },

    /// Relational store error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Document store error
    #[error("Document store error: {0}")]
    DocumentStore(#[from] mongodb::error::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::Expired
            | AuthError::Unauthorized
            | AuthError::UserIsUnlogged => ErrorKind::Unauthorized,
            AuthError::AlreadyExists
            | AuthError::AlreadyLoggedIn
            | AuthError::AlreadyLoggedOut => ErrorKind::Conflict,
            AuthError::NotFound => ErrorKind::NotFound,
            AuthError::InvalidLogin(_) | AuthError::PasswordValidation(_) => {
                ErrorKind::BadRequest
            }
            AuthError::Database(_) | AuthError::DocumentStore(_) => ErrorKind::ServiceUnavailable,
            AuthError::CompensationFailed { .. } | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError for the boundary layer
    ///
    /// Store and internal details are not exposed in the message.
    pub fn to_app_error(&self) -> AppError {
        match self.kind() {
            kind if kind.is_server_error() => AppError::new(kind, "Internal error"),
            ErrorKind::Unauthorized => match self {
                AuthError::Expired | AuthError::UserIsUnlogged => {
                    AppError::unauthorized(self.to_string()).with_action("Please sign in again")
                }
                _ => AppError::unauthorized(self.to_string()),
            },
            kind => AppError::new(kind, self.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::CompensationFailed { user_id, source } => {
                tracing::error!(
                    user_id = %user_id,
                    error = %source,
                    "Registration left an orphaned user record; operator action required"
                );
            }
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::DocumentStore(e) => {
                tracing::error!(error = %e, "Auth document store error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        err.to_app_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(AuthError::InvalidCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(AuthError::Expired.kind(), ErrorKind::Unauthorized);
        assert_eq!(AuthError::UserIsUnlogged.kind(), ErrorKind::Unauthorized);
        assert_eq!(AuthError::AlreadyExists.kind(), ErrorKind::Conflict);
        assert_eq!(AuthError::AlreadyLoggedIn.kind(), ErrorKind::Conflict);
        assert_eq!(AuthError::AlreadyLoggedOut.kind(), ErrorKind::Conflict);
        assert_eq!(AuthError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            AuthError::PasswordValidation("short".into()).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            AuthError::Internal("boom".into()).kind(),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_compensation_failure_is_fatal() {
        let err = AuthError::CompensationFailed {
            user_id: "u-1".to_string(),
            source: Box::new(AuthError::Internal("delete failed".into())),
        };
        assert!(err.kind().is_server_error());
        assert!(err.to_string().contains("u-1"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_app_error_hides_internal_details() {
        let app = AuthError::Internal("connection string leaked".into()).to_app_error();
        assert_eq!(app.status_code(), 500);
        assert!(!app.message().contains("leaked"));
    }

    #[test]
    fn test_app_error_for_expired_has_action() {
        let app: AppError = AuthError::Expired.into();
        assert_eq!(app.status_code(), 401);
        assert_eq!(app.action(), Some("Please sign in again"));
    }

    #[test]
    fn test_credentials_message_does_not_enumerate() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid login or password"
        );
    }
}
