//! List Users Use Case
//!
//! Directory of every registered user. Records never carry their refresh
//! token outward.

use std::sync::Arc;

use crate::domain::entity::user::UserRecord;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// List users use case
pub struct ListUsersUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> ListUsersUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    pub async fn execute(&self) -> AuthResult<Vec<UserRecord>> {
        let users = self.session_repo.list().await?;
        tracing::debug!(count = users.len(), "Listed users");
        Ok(users)
    }
}
