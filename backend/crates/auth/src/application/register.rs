//! Register Use Case
//!
//! Creates the user identity record and its credential across the two
//! stores. The stores share no transaction; a failed credential write is
//! undone by deleting the identity record again.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::hashing::hash_password;
use crate::domain::entity::{credential::Credential, user::UserRecord};
use crate::domain::repository::{CredentialRepository, SessionRepository};
use crate::domain::value_object::login::Login;
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub login: String,
    pub password: String,
    pub name: String,
    pub last_name: String,
}

/// Register use case
pub struct RegisterUseCase<S, C>
where
    S: SessionRepository,
    C: CredentialRepository,
{
    session_repo: Arc<S>,
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<S, C> RegisterUseCase<S, C>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<UserRecord> {
        let login = Login::new(&input.login).map_err(|e| AuthError::InvalidLogin(e.to_string()))?;

        if self.session_repo.find_by_login(&login).await?.is_some() {
            return Err(AuthError::AlreadyExists);
        }

        let password = ClearTextPassword::new(input.password);
        password
            .check_policy(self.config.password_min_length)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;

        // Hash before the first write so the two inserts run back to back
        let password_hash = hash_password(
            password,
            self.config.pepper().map(<[u8]>::to_vec),
            self.config.hash_cost,
        )
        .await?;

        let user = UserRecord::new(login, input.name, input.last_name);
        let credential = Credential::new(user.user_id, password_hash, user.created_at);

        self.session_repo.insert(&user).await?;

        if let Err(err) = self.credential_repo.put(&credential).await {
            return Err(self.compensate(&user, err).await);
        }

        tracing::info!(
            user_id = %user.user_id,
            login = %user.login,
            "User registered"
        );

        Ok(user)
    }

    /// Undo the identity insert after a failed credential write
    ///
    /// Returns the error to surface: the original one when the delete
    /// succeeds, `CompensationFailed` otherwise.
    async fn compensate(&self, user: &UserRecord, original: AuthError) -> AuthError {
        tracing::warn!(
            user_id = %user.user_id,
            login = %user.login,
            error = %original,
            "Credential write failed, removing user record"
        );

        match self.session_repo.delete(&user.user_id).await {
            Ok(()) => original,
            Err(delete_err) => {
                let err = AuthError::CompensationFailed {
                    user_id: user.user_id.to_string(),
                    source: Box::new(delete_err),
                };
                err.log();
                err
            }
        }
    }
}
