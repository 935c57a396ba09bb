//! In-Memory Repository Implementations
//!
//! Same contracts as the database-backed stores, for tests and local runs.
//! Each store can be told to fail so the registration compensation path can
//! be exercised without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entity::{credential::Credential, user::UserRecord};
use crate::domain::repository::{CredentialRepository, SessionRepository};
use crate::domain::value_object::{login::Login, user_id::UserId};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Session Store
// ============================================================================

#[derive(Default)]
pub struct MemorySessionRepository {
    users: RwLock<HashMap<UserId, UserRecord>>,
    fail_deletes: AtomicBool,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `delete` fail
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl SessionRepository for MemorySessionRepository {
    async fn find_by_login(&self, login: &Login) -> AuthResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.login == login).cloned())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn list(&self) -> AuthResult<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.login.as_str().cmp(b.login.as_str()))
        });
        Ok(users)
    }

    async fn insert(&self, user: &UserRecord) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.user_id) || users.values().any(|u| u.login == user.login) {
            return Err(AuthError::AlreadyExists);
        }
        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn update_login_state(
        &self,
        user_id: &UserId,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or(AuthError::NotFound)?;
        user.record_login(refresh_token.to_string(), now);
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        user_id: &UserId,
        current: &str,
        next: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) if user.logged_in && user.current_refresh_token() == Some(current) => {
                user.record_login(next.to_string(), now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_logout_state(&self, user_id: &UserId, now: DateTime<Utc>) -> AuthResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or(AuthError::NotFound)?;
        user.record_logout(now);
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AuthError::Internal("injected delete failure".to_string()));
        }
        self.users.write().await.remove(user_id);
        Ok(())
    }
}

// ============================================================================
// Credential Store
// ============================================================================

#[derive(Default)]
pub struct MemoryCredentialRepository {
    credentials: RwLock<HashMap<UserId, Credential>>,
    fail_next_put: AtomicBool,
}

impl MemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `put` fail once
    pub fn fail_next_put(&self) {
        self.fail_next_put.store(true, Ordering::SeqCst);
    }

    /// Number of stored credentials
    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }

    /// Drop a credential, leaving its user record orphaned
    pub async fn remove(&self, user_id: &UserId) -> Option<Credential> {
        self.credentials.write().await.remove(user_id)
    }
}

impl CredentialRepository for MemoryCredentialRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
        Ok(self.credentials.read().await.get(user_id).cloned())
    }

    async fn put(&self, credential: &Credential) -> AuthResult<()> {
        if self.fail_next_put.swap(false, Ordering::SeqCst) {
            return Err(AuthError::Internal("injected put failure".to_string()));
        }

        let mut credentials = self.credentials.write().await;
        if credentials.contains_key(&credential.user_id) {
            return Err(AuthError::AlreadyExists);
        }
        credentials.insert(credential.user_id, credential.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(login: &str) -> UserRecord {
        UserRecord::new(Login::new(login).unwrap(), "N".into(), "L".into())
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_login() {
        let repo = MemorySessionRepository::new();
        repo.insert(&user("alice")).await.unwrap();

        let result = repo.insert(&user("alice")).await;
        assert!(matches!(result, Err(AuthError::AlreadyExists)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_updates_on_missing_user() {
        let repo = MemorySessionRepository::new();
        let id = UserId::new();

        assert!(matches!(
            repo.update_login_state(&id, "rt", Utc::now()).await,
            Err(AuthError::NotFound)
        ));
        assert!(matches!(
            repo.update_logout_state(&id, Utc::now()).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_logout_keeps_refresh_token() {
        let repo = MemorySessionRepository::new();
        let alice = user("alice");
        repo.insert(&alice).await.unwrap();

        repo.update_login_state(&alice.user_id, "rt", Utc::now())
            .await
            .unwrap();
        repo.update_logout_state(&alice.user_id, Utc::now())
            .await
            .unwrap();

        let stored = repo.find_by_id(&alice.user_id).await.unwrap().unwrap();
        assert!(!stored.logged_in);
        assert_eq!(stored.current_refresh_token(), Some("rt"));
    }

    #[tokio::test]
    async fn test_rotation_requires_current_token() {
        let repo = MemorySessionRepository::new();
        let alice = user("alice");
        repo.insert(&alice).await.unwrap();
        repo.update_login_state(&alice.user_id, "rt-1", Utc::now())
            .await
            .unwrap();

        assert!(
            repo.rotate_refresh_token(&alice.user_id, "rt-1", "rt-2", Utc::now())
                .await
                .unwrap()
        );
        // rt-1 is gone, a second swap from it must not apply
        assert!(
            !repo
                .rotate_refresh_token(&alice.user_id, "rt-1", "rt-3", Utc::now())
                .await
                .unwrap()
        );

        let stored = repo.find_by_id(&alice.user_id).await.unwrap().unwrap();
        assert_eq!(stored.current_refresh_token(), Some("rt-2"));
    }

    #[tokio::test]
    async fn test_rotation_skips_closed_session() {
        let repo = MemorySessionRepository::new();
        let alice = user("alice");
        repo.insert(&alice).await.unwrap();
        repo.update_login_state(&alice.user_id, "rt", Utc::now())
            .await
            .unwrap();
        repo.update_logout_state(&alice.user_id, Utc::now())
            .await
            .unwrap();

        assert!(
            !repo
                .rotate_refresh_token(&alice.user_id, "rt", "rt-2", Utc::now())
                .await
                .unwrap()
        );
        assert!(
            !repo
                .rotate_refresh_token(&UserId::new(), "rt", "rt-2", Utc::now())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_fail_deletes() {
        let repo = MemorySessionRepository::new();
        let alice = user("alice");
        repo.insert(&alice).await.unwrap();

        repo.fail_deletes(true);
        assert!(repo.delete(&alice.user_id).await.is_err());
        assert_eq!(repo.len().await, 1);

        repo.fail_deletes(false);
        repo.delete(&alice.user_id).await.unwrap();
        assert!(repo.is_empty().await);
    }
}
