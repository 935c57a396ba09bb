//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod hashing;
pub mod list_users;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod resolve_identity;
pub mod session_manager;
pub mod tokens;

// Re-exports
pub use config::{AuthConfig, ConfigError, StorageConfig};
pub use list_users::ListUsersUseCase;
pub use login::{LoginInput, LoginUseCase, SessionOutput};
pub use logout::LogoutUseCase;
pub use refresh::{RefreshInput, RefreshUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use resolve_identity::{ResolveIdentityUseCase, ResolvedIdentity};
pub use session_manager::SessionManager;
