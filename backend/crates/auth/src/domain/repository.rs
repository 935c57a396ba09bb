//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure
//! layer. The two stores are independent: neither ever touches the other's
//! rows, and nothing here spans both.

use chrono::{DateTime, Utc};

use crate::domain::entity::{credential::Credential, user::UserRecord};
use crate::domain::value_object::{login::Login, user_id::UserId};
use crate::error::AuthResult;

/// Session store: user identity plus mutable session state
///
/// Both lookups must be backed by unique indexes. Every state update must be
/// a single atomic write on the store side. Login and logout resolve as
/// last-write-wins; refresh rotation is a compare-and-set on the stored token.
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Find user by login
    async fn find_by_login(&self, login: &Login) -> AuthResult<Option<UserRecord>>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<UserRecord>>;

    /// All users, oldest registration first
    async fn list(&self) -> AuthResult<Vec<UserRecord>>;

    /// Insert a new user
    ///
    /// Fails with `AuthError::AlreadyExists` when the ID or login is taken.
    async fn insert(&self, user: &UserRecord) -> AuthResult<()>;

    /// Atomically set refresh token, `last_login_at`, `updated_at` and
    /// `logged_in = true`
    ///
    /// Fails with `AuthError::NotFound` when no record matches.
    async fn update_login_state(
        &self,
        user_id: &UserId,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<()>;

    /// Atomically replace the stored refresh token `current` with `next` and
    /// stamp `last_login_at` and `updated_at`
    ///
    /// Applies only while the session is open and `current` is still the
    /// stored value. Returns `false` when nothing matched, which includes a
    /// concurrent rotation that won the race.
    async fn rotate_refresh_token(
        &self,
        user_id: &UserId,
        current: &str,
        next: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<bool>;

    /// Atomically set `logged_in = false` and `updated_at`
    ///
    /// The stored refresh token is left untouched. Fails with
    /// `AuthError::NotFound` when no record matches.
    async fn update_logout_state(&self, user_id: &UserId, now: DateTime<Utc>) -> AuthResult<()>;

    /// Delete a user (only used to compensate a failed registration)
    async fn delete(&self, user_id: &UserId) -> AuthResult<()>;
}

/// Credential store: append-only password hashes
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Find the credential for a user
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>>;

    /// Insert a credential; never overwrites an existing one
    async fn put(&self, credential: &Credential) -> AuthResult<()>;
}
