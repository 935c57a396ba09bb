//! Token Identity Value Object
//!
//! The identity embedded in access tokens. Refresh tokens carry none.

use platform::crypto::{constant_time_eq, sha256, to_base64url};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::UserRecord;

/// Identity claims carried under the `user` claim of an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdentity {
    /// User identifier (string form of [`UserId`](super::user_id::UserId))
    pub id: String,
    pub login: String,
    pub name: String,
    /// Fingerprint of the refresh token minted alongside this access token
    pub sid: String,
}

impl TokenIdentity {
    /// Identity for an access token paired with `refresh_token`
    pub fn for_session(user: &UserRecord, refresh_token: &str) -> Self {
        Self {
            id: user.user_id.to_string(),
            login: user.login.to_string(),
            name: user.name.clone(),
            sid: fingerprint(refresh_token),
        }
    }

    /// Whether this identity was minted together with `refresh_token`
    pub fn is_paired_with(&self, refresh_token: &str) -> bool {
        constant_time_eq(self.sid.as_bytes(), fingerprint(refresh_token).as_bytes())
    }
}

fn fingerprint(refresh_token: &str) -> String {
    to_base64url(&sha256(refresh_token.as_bytes()))
}
