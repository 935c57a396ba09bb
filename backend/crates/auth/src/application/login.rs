//! Login Use Case
//!
//! Verifies a password and opens the user's single session.

use std::sync::Arc;

use chrono::Utc;
use platform::password::ClearTextPassword;
use platform::token::TokenCodec;

use crate::application::config::AuthConfig;
use crate::application::hashing::{spend_verification_time, verify_password};
use crate::application::tokens::{mint_pair, refresh_token_is_live};
use crate::domain::entity::user::UserRecord;
use crate::domain::repository::{CredentialRepository, SessionRepository};
use crate::domain::value_object::login::Login;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub login: String,
    pub password: String,
}

/// Tokens and record returned by Login and Refresh
///
/// The caller keeps the refresh token client-side; only the latest one
/// issued for a user is accepted.
pub struct SessionOutput {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserRecord,
}

/// Login use case
pub struct LoginUseCase<S, C>
where
    S: SessionRepository,
    C: CredentialRepository,
{
    session_repo: Arc<S>,
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
    codec: TokenCodec,
}

impl<S, C> LoginUseCase<S, C>
where
    S: SessionRepository,
    C: CredentialRepository,
{
    pub fn new(session_repo: Arc<S>, credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            credential_repo,
            config,
            codec: TokenCodec::new(),
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<SessionOutput> {
        // Malformed and unknown logins are indistinguishable from a wrong password
        let login = Login::new(&input.login).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(mut user) = self.session_repo.find_by_login(&login).await? else {
            self.spend_verification_time(input.password).await;
            return Err(AuthError::InvalidCredentials);
        };

        if self.has_live_session(&user) {
            return Err(AuthError::AlreadyLoggedIn);
        }

        let Some(credential) = self.credential_repo.find_by_user_id(&user.user_id).await? else {
            tracing::warn!(
                user_id = %user.user_id,
                login = %user.login,
                "User record has no credential"
            );
            self.spend_verification_time(input.password).await;
            return Err(AuthError::InvalidCredentials);
        };

        let verified = verify_password(
            ClearTextPassword::new(input.password),
            credential.password_hash,
            self.config.pepper().map(<[u8]>::to_vec),
        )
        .await?;
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let pair = mint_pair(&self.codec, &self.config, &user, now)?;

        self.session_repo
            .update_login_state(&user.user_id, &pair.refresh_token, now)
            .await?;
        user.record_login(pair.refresh_token.clone(), now);

        tracing::info!(
            user_id = %user.user_id,
            login = %user.login,
            "User logged in"
        );

        Ok(SessionOutput {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            user,
        })
    }

    async fn spend_verification_time(&self, password: String) {
        spend_verification_time(
            ClearTextPassword::new(password),
            self.config.pepper().map(<[u8]>::to_vec),
            self.config.hash_cost,
        )
        .await;
    }

    /// `logged_in` alone may be stale once the refresh token has expired
    fn has_live_session(&self, user: &UserRecord) -> bool {
        user.logged_in
            && user
                .current_refresh_token()
                .is_some_and(|token| refresh_token_is_live(&self.codec, &self.config, token))
    }
}
