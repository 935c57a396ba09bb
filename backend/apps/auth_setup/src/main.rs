//! Auth Store Setup
//!
//! Prepares both stores for the session lifecycle: applies the credential
//! schema and creates the unique indexes on the users collection.
//! Uses `anyhow` for startup errors; the library itself returns
//! `auth::AuthError`.

use auth::{AuthConfig, MongoSessionRepository, PgCredentialRepository, StorageConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_setup=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail early on a missing token secret
    let auth_config = AuthConfig::from_env()?;
    let storage = StorageConfig::from_env()?;
    tracing::info!(config = ?auth_config, storage = ?storage, "Configuration loaded");

    let credentials = PgCredentialRepository::connect(&storage).await?;
    credentials.migrate().await?;

    let sessions = MongoSessionRepository::connect(&storage).await?;
    sessions.ensure_indexes().await?;

    tracing::info!("Auth stores ready");
    Ok(())
}
