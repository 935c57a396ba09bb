//! Signed Expiring Tokens
//!
//! HS256 compact tokens (`header.claims.signature`, each segment unpadded
//! base64url) carrying an issue time, an expiry time, a random nonce and an
//! optional payload.
//!
//! The codec is stateless. The signing secret is passed on every call so a
//! single codec can serve several tenants and tests never share keys.
//! Tokens are not revocable here; revocation is the caller's business.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{from_base64url, hmac_sha256, random_bytes, to_base64url, verify_hmac_sha256};

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// Nonce length in bytes
const JTI_LEN: usize = 16;

/// Token issuing errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// Claims could not be serialized
    #[error("Token encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The signing backend rejected the key
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Outcome of [`TokenCodec::verify`]
///
/// | token                         | payload            | valid   |
/// |-------------------------------|--------------------|---------|
/// | well-signed, unexpired        | as issued          | `true`  |
/// | well-signed, expired          | as issued          | `false` |
/// | bad signature / malformed     | `None`             | `false` |
///
/// An expired payload may be inspected (e.g. to find whose session to
/// refresh) but must never be trusted for authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken<P> {
    pub payload: Option<P>,
    pub valid: bool,
}

impl<P> VerifiedToken<P> {
    fn rejected() -> Self {
        Self {
            payload: None,
            valid: false,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

#[derive(Serialize, Deserialize)]
struct Claims<P> {
    iat: i64,
    exp: i64,
    jti: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<P>,
}

/// Stateless token issuer and verifier
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCodec;

impl TokenCodec {
    pub fn new() -> Self {
        Self
    }

    /// Issue a token expiring at `expires_at`
    ///
    /// `payload` is embedded under the `user` claim when present; tokens
    /// without a payload are opaque and only useful for comparison.
    pub fn issue<P: Serialize>(
        &self,
        secret: &[u8],
        expires_at: DateTime<Utc>,
        payload: Option<&P>,
    ) -> Result<String, TokenError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        };
        let claims = Claims {
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
            jti: to_base64url(&random_bytes(JTI_LEN)),
            user: payload,
        };

        let signing_input = format!(
            "{}.{}",
            to_base64url(&serde_json::to_vec(&header)?),
            to_base64url(&serde_json::to_vec(&claims)?)
        );
        let signature = hmac_sha256(secret, signing_input.as_bytes())
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(format!("{}.{}", signing_input, to_base64url(&signature)))
    }

    /// Verify signature and expiry against the current clock
    ///
    /// A token is valid while `now < exp`.
    pub fn verify<P: DeserializeOwned>(&self, secret: &[u8], token: &str) -> VerifiedToken<P> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return VerifiedToken::rejected();
        };

        let header: Option<Header> = from_base64url(header_b64)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok());
        match header {
            Some(h) if h.alg == ALGORITHM => {}
            _ => return VerifiedToken::rejected(),
        }

        let Ok(signature) = from_base64url(signature_b64) else {
            return VerifiedToken::rejected();
        };
        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        if !verify_hmac_sha256(secret, signing_input.as_bytes(), &signature) {
            return VerifiedToken::rejected();
        }

        let claims: Claims<P> = match from_base64url(claims_b64)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        {
            Some(claims) => claims,
            None => return VerifiedToken::rejected(),
        };

        VerifiedToken {
            valid: Utc::now().timestamp() < claims.exp,
            payload: claims.user,
        }
    }
}
