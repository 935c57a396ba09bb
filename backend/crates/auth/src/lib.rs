//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, configuration and the `SessionManager`
//! - `infra/` - Store implementations
//!
//! ## Features
//! - Registration across two stores with compensation on partial failure
//! - Login with a single active session per user
//! - Access tokens carrying identity, opaque rotating refresh tokens
//! - Identity resolution with transparent renewal of expired access tokens
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, verified on the blocking pool
//! - Unknown login and wrong password are the same error
//! - Only the most recently issued refresh token is honoured

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;


// Re-exports for convenience
pub use application::{
    AuthConfig, ConfigError, LoginInput, RefreshInput, RegisterInput, ResolvedIdentity,
    SessionManager, SessionOutput, StorageConfig,
};
pub use domain::value_object::token_identity::TokenIdentity;
pub use domain::{Credential, CredentialRepository, SessionRepository, UserRecord};
pub use error::{AuthError, AuthResult};
pub use infra::{
    MemoryCredentialRepository, MemorySessionRepository, MongoSessionRepository,
    PgCredentialRepository,
};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
