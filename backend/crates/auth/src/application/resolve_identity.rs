//! Resolve Identity Use Case
//!
//! "Who am I" for an access token, with a transparent refresh when the
//! token has expired but the session is still open.

use std::sync::Arc;

use platform::token::{TokenCodec, VerifiedToken};

use crate::application::config::AuthConfig;
use crate::application::refresh::RefreshUseCase;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::{token_identity::TokenIdentity, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// Outcome of resolving an access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedIdentity {
    /// The presented token is still valid and is returned unchanged
    Current {
        access_token: String,
        identity: TokenIdentity,
    },
    /// The presented token had expired; the caller must adopt both new
    /// tokens, the previous refresh token is no longer accepted
    Renewed {
        access_token: String,
        refresh_token: String,
    },
}

/// Resolve identity use case
pub struct ResolveIdentityUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
    codec: TokenCodec,
}

impl<S> ResolveIdentityUseCase<S>
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

    pub async fn execute(&self, access_token: &str) -> AuthResult<ResolvedIdentity> {
        let verified: VerifiedToken<TokenIdentity> =
            self.codec.verify(&self.config.token_secret, access_token);

        let Some(identity) = verified.payload else {
            return Err(AuthError::Unauthorized);
        };
        let user_id: UserId = identity.id.parse().map_err(|_| AuthError::Unauthorized)?;

        let user = self
            .session_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !user.logged_in {
            return Err(AuthError::UserIsUnlogged);
        }

        if verified.valid {
            return Ok(ResolvedIdentity::Current {
                access_token: access_token.to_string(),
                identity,
            });
        }

        // Expired but well-signed: renew from the stored refresh token, but
        // only for the pair that token belongs to. When it has expired too
        // the caller must log in again.
        let stored = user
            .current_refresh_token()
            .map(str::to_string)
            .ok_or(AuthError::Expired)?;
        if !identity.is_paired_with(&stored) {
            tracing::debug!(user_id = %user_id, "Expired access token from a superseded pair");
            return Err(AuthError::Expired);
        }
        let renewed = RefreshUseCase::new(self.session_repo.clone(), self.config.clone())
            .rotate(user, &stored)
            .await?;

        tracing::info!(user_id = %user_id, "Access token renewed by soft refresh");

        Ok(ResolvedIdentity::Renewed {
            access_token: renewed.access_token,
            refresh_token: renewed.refresh_token,
        })
    }
}
