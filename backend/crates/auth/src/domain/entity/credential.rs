//! Credential Entity
//!
//! The one-way password hash for a user, kept in the relational store
//! apart from the identity record. Created once at registration and never
//! updated.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::user_id::UserId;

#[derive(Debug, Clone)]
pub struct Credential {
    /// Reference to the user identity record (1:1)
    pub user_id: UserId,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(user_id: UserId, password_hash: HashedPassword, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            password_hash,
            created_at,
        }
    }
}
