//! Token Pair Minting
//!
//! Access tokens embed a [`TokenIdentity`]; refresh tokens are opaque.

use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::token::{TokenCodec, VerifiedToken};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::UserRecord;
use crate::domain::value_object::token_identity::TokenIdentity;
use crate::error::{AuthError, AuthResult};

/// A freshly minted access + refresh pair
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> AuthResult<DateTime<Utc>> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AuthError::Internal("Token lifetime out of range".to_string()))
}

/// Mint a new pair for `user`
///
/// The access token is bound to its refresh token, so an expired access
/// token can only be renewed while its pair is the stored one.
pub fn mint_pair(
    codec: &TokenCodec,
    config: &AuthConfig,
    user: &UserRecord,
    now: DateTime<Utc>,
) -> AuthResult<TokenPair> {
    let refresh_token = codec
        .issue::<TokenIdentity>(
            &config.token_secret,
            expiry(now, config.refresh_token_ttl)?,
            None,
        )
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    let identity = TokenIdentity::for_session(user, &refresh_token);
    let access_token = codec
        .issue(
            &config.token_secret,
            expiry(now, config.access_token_ttl)?,
            Some(&identity),
        )
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Whether a stored refresh token is still honoured by the codec
pub fn refresh_token_is_live(codec: &TokenCodec, config: &AuthConfig, token: &str) -> bool {
    let verified: VerifiedToken<TokenIdentity> = codec.verify(&config.token_secret, token);
    verified.valid
}
