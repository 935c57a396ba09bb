//! Refresh Use Case
//!
//! Exchanges the current refresh token for a new access + refresh pair.
//! Every refresh rotates the stored token with a compare-and-set, so each
//! issued value can be used at most once, even by concurrent callers.

use std::sync::Arc;

use chrono::Utc;
use platform::crypto::constant_time_eq;
use platform::token::TokenCodec;

use crate::application::config::AuthConfig;
use crate::application::login::SessionOutput;
use crate::application::tokens::{mint_pair, refresh_token_is_live};
use crate::domain::entity::user::UserRecord;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Refresh input
pub struct RefreshInput {
    pub user_id: String,
    pub refresh_token: String,
}

/// Refresh use case
pub struct RefreshUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
    codec: TokenCodec,
}

impl<S> RefreshUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
            codec: TokenCodec::new(),
        }
    }

    pub async fn execute(&self, input: RefreshInput) -> AuthResult<SessionOutput> {
        let user_id: UserId = input.user_id.parse().map_err(|_| AuthError::NotFound)?;

        let user = self
            .session_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        self.rotate(user, &input.refresh_token).await
    }

    /// Check `supplied` against `user` and issue the next pair
    pub(crate) async fn rotate(
        &self,
        mut user: UserRecord,
        supplied: &str,
    ) -> AuthResult<SessionOutput> {
        if !refresh_token_is_live(&self.codec, &self.config, supplied) {
            return Err(AuthError::Expired);
        }

        // Logout keeps the stored value; the flag retires it
        if !user.logged_in {
            return Err(AuthError::Expired);
        }

        let matches_stored = user
            .current_refresh_token()
            .is_some_and(|stored| constant_time_eq(stored.as_bytes(), supplied.as_bytes()));
        if !matches_stored {
            tracing::debug!(user_id = %user.user_id, "Superseded refresh token presented");
            return Err(AuthError::Expired);
        }

        let now = Utc::now();
        let pair = mint_pair(&self.codec, &self.config, &user, now)?;

        // A concurrent rotation from the same token may have won meanwhile
        let rotated = self
            .session_repo
            .rotate_refresh_token(&user.user_id, supplied, &pair.refresh_token, now)
            .await?;
        if !rotated {
            tracing::debug!(user_id = %user.user_id, "Refresh token rotated concurrently");
            return Err(AuthError::Expired);
        }
        user.record_login(pair.refresh_token.clone(), now);

        tracing::info!(user_id = %user.user_id, "Session refreshed");

        Ok(SessionOutput {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            user,
        })
    }
}
