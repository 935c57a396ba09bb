//! PostgreSQL Credential Repository

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::application::config::StorageConfig;
use crate::domain::entity::credential::Credential;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgCredentialRepository {
    pool: PgPool,
}

impl PgCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from storage settings
    pub async fn connect(config: &StorageConfig) -> AuthResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.postgres_max_connections)
            .connect(&config.postgres_url)
            .await?;

        tracing::info!("Connected to credential database");
        Ok(Self::new(pool))
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> AuthResult<()> {
        sqlx::migrate!("../../database/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AuthError::Database(e.into()))?;

        tracing::info!("Credential migrations completed");
        Ok(())
    }
}

impl CredentialRepository for PgCredentialRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                user_id,
                password_hash,
                created_at
            FROM credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_credential()).transpose()
    }

    async fn put(&self, credential: &Credential) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO credentials (
                user_id,
                password_hash,
                created_at
            ) VALUES ($1, $2, $3)
            "#,
        )
        .bind(credential.user_id.as_uuid())
        .bind(credential.password_hash.as_phc_string())
        .bind(credential.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AuthError::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: Uuid,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> AuthResult<Credential> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Credential::new(
            UserId::from_uuid(self.user_id),
            password_hash,
            self.created_at,
        ))
    }
}
