//! User Entity
//!
//! User identity plus session state, owned by the session store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_object::{login::Login, user_id::UserId};

/// User identity record
///
/// Sensitive credential data lives in [`Credential`](super::credential::Credential)
/// in a separate store. The current refresh token is kept here so that only
/// the most recently issued value is honoured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    /// Identifier generated at registration (immutable)
    #[serde(rename = "id")]
    pub user_id: UserId,
    /// Unique login (immutable)
    pub login: Login,
    pub name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Last successful login or refresh
    pub last_login_at: Option<DateTime<Utc>>,
    /// Most recently issued refresh token, never serialized outward
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub logged_in: bool,
}

impl UserRecord {
    /// Create a new, logged-out user
    pub fn new(login: Login, name: String, last_name: String) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            login,
            name,
            last_name,
            created_at: now,
            updated_at: now,
            last_login_at: None,
            refresh_token: None,
            logged_in: false,
        }
    }

    /// Mirror of the store's login-state update
    pub fn record_login(&mut self, refresh_token: String, now: DateTime<Utc>) {
        self.refresh_token = Some(refresh_token);
        self.last_login_at = Some(now);
        self.updated_at = now;
        self.logged_in = true;
    }

    /// Mirror of the store's logout-state update
    ///
    /// The refresh token stays in place; it is no longer honoured once
    /// `logged_in` is false.
    pub fn record_logout(&mut self, now: DateTime<Utc>) {
        self.logged_in = false;
        self.updated_at = now;
    }

    /// The stored refresh token, if one is set and non-empty
    pub fn current_refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }
}
