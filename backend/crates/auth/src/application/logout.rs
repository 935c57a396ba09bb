//! Logout Use Case
//!
//! Closes the user's session. Access tokens already issued stay valid
//! until they expire; only further refreshes are refused.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::repository::SessionRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    pub async fn execute(&self, user_id: &str) -> AuthResult<()> {
        let user_id: UserId = user_id
            .parse()
            .map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .session_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.logged_in {
            return Err(AuthError::AlreadyLoggedOut);
        }

        self.session_repo
            .update_logout_state(&user.user_id, Utc::now())
            .await?;

        tracing::info!(user_id = %user.user_id, "User logged out");
        Ok(())
    }
}
