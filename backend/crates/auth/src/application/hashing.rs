//! Password Hashing on the Blocking Pool
//!
//! Argon2 is deliberately slow; running it inline would stall every other
//! request scheduled on the same worker.

use platform::password::{ClearTextPassword, HashCost, HashedPassword};

use crate::error::{AuthError, AuthResult};

/// Hash a new password off the async runtime
pub async fn hash_password(
    password: ClearTextPassword,
    pepper: Option<Vec<u8>>,
    cost: HashCost,
) -> AuthResult<HashedPassword> {
    tokio::task::spawn_blocking(move || password.hash(pepper.as_deref(), cost))
        .await
        .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AuthError::Internal(e.to_string()))
}

/// Verify a password against a stored hash off the async runtime
pub async fn verify_password(
    password: ClearTextPassword,
    hash: HashedPassword,
    pepper: Option<Vec<u8>>,
) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || hash.verify(&password, pepper.as_deref()))
        .await
        .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))
}

/// Spend one hash worth of Argon2 work when there is no stored hash to
/// verify against, so a missing user takes as long as a wrong password
pub async fn spend_verification_time(
    password: ClearTextPassword,
    pepper: Option<Vec<u8>>,
    cost: HashCost,
) {
    if let Err(e) = hash_password(password, pepper, cost).await {
        tracing::warn!(error = %e, "Placeholder hash failed");
    }
}
