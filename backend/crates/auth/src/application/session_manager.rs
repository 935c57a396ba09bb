//! Session Manager
//!
//! Entry point for the session lifecycle. Holds only shared handles to the
//! stores and configuration; all session state lives in the session store,
//! so clones can serve requests concurrently.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::list_users::ListUsersUseCase;
use crate::application::login::{LoginInput, LoginUseCase, SessionOutput};
use crate::application::logout::LogoutUseCase;
use crate::application::refresh::{RefreshInput, RefreshUseCase};
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::application::resolve_identity::{ResolveIdentityUseCase, ResolvedIdentity};
use crate::domain::entity::user::UserRecord;
use crate::domain::repository::{CredentialRepository, SessionRepository};
use crate::error::AuthResult;

pub struct SessionManager<S, C>
where
    S: SessionRepository,
    C: CredentialRepository,
{
    session_repo: Arc<S>,
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<S, C> Clone for SessionManager<S, C>
where
    S: SessionRepository,
    C: CredentialRepository,
{
    fn clone(&self) -> Self {
        Self {
            session_repo: self.session_repo.clone(),
            credential_repo: self.credential_repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S, C> SessionManager<S, C>
where
    S: SessionRepository,
    C: CredentialRepository,
{
    pub fn new(session_repo: Arc<S>, credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            credential_repo,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Create a user and its credential
    pub async fn register(&self, input: RegisterInput) -> AuthResult<UserRecord> {
        RegisterUseCase::new(
            self.session_repo.clone(),
            self.credential_repo.clone(),
            self.config.clone(),
        )
        .execute(input)
        .await
    }

    /// Authenticate and open a session
    pub async fn login(&self, input: LoginInput) -> AuthResult<SessionOutput> {
        LoginUseCase::new(
            self.session_repo.clone(),
            self.credential_repo.clone(),
            self.config.clone(),
        )
        .execute(input)
        .await
    }

    /// Rotate the refresh token and issue a new access token
    pub async fn refresh(&self, input: RefreshInput) -> AuthResult<SessionOutput> {
        RefreshUseCase::new(self.session_repo.clone(), self.config.clone())
            .execute(input)
            .await
    }

    /// Close the session of `user_id`
    pub async fn unlogin(&self, user_id: &str) -> AuthResult<()> {
        LogoutUseCase::new(self.session_repo.clone())
            .execute(user_id)
            .await
    }

    /// Resolve the identity behind an access token
    pub async fn resolve_identity(&self, access_token: &str) -> AuthResult<ResolvedIdentity> {
        ResolveIdentityUseCase::new(self.session_repo.clone(), self.config.clone())
            .execute(access_token)
            .await
    }

    /// Every registered user, oldest first
    pub async fn list_users(&self) -> AuthResult<Vec<UserRecord>> {
        ListUsersUseCase::new(self.session_repo.clone())
            .execute()
            .await
    }
}
