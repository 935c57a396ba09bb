//! MongoDB Session Repository
//!
//! One document per user in the `users` collection. Session state changes
//! are single-document `$set` updates, which MongoDB applies atomically.

use chrono::{DateTime, Utc};
use mongodb::bson::{DateTime as BsonDateTime, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use crate::application::config::StorageConfig;
use crate::domain::entity::user::UserRecord;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::{login::Login, user_id::UserId};
use crate::error::{AuthError, AuthResult};

const USERS_COLLECTION: &str = "users";

/// Server error code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB-backed session store
#[derive(Clone)]
pub struct MongoSessionRepository {
    users: Collection<UserDocument>,
}

impl MongoSessionRepository {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            users: client.database(database).collection(USERS_COLLECTION),
        }
    }

    /// Connect using storage settings
    pub async fn connect(config: &StorageConfig) -> AuthResult<Self> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;

        tracing::info!(database = %config.mongo_database, "Connected to session store");
        Ok(Self::new(&client, &config.mongo_database))
    }

    /// Create the unique indexes both lookups rely on
    pub async fn ensure_indexes(&self) -> AuthResult<()> {
        for field in ["guid", "login"] {
            let mut keys = Document::new();
            keys.insert(field, 1);
            let index = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build();
            self.users.create_index(index).await?;
        }

        tracing::info!("Session store indexes ensured");
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

impl SessionRepository for MongoSessionRepository {
    async fn find_by_login(&self, login: &Login) -> AuthResult<Option<UserRecord>> {
        self.users
            .find_one(doc! { "login": login.as_str() })
            .await?
            .map(UserDocument::into_record)
            .transpose()
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<UserRecord>> {
        self.users
            .find_one(doc! { "guid": user_id.to_string() })
            .await?
            .map(UserDocument::into_record)
            .transpose()
    }

    async fn list(&self) -> AuthResult<Vec<UserRecord>> {
        let mut cursor = self
            .users
            .find(doc! {})
            .sort(doc! { "created_at": 1, "login": 1 })
            .await?;

        let mut users = Vec::new();
        while cursor.advance().await? {
            users.push(cursor.deserialize_current()?.into_record()?);
        }
        Ok(users)
    }

    async fn insert(&self, user: &UserRecord) -> AuthResult<()> {
        match self.users.insert_one(UserDocument::from(user)).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(AuthError::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_login_state(
        &self,
        user_id: &UserId,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        let now = to_bson(now);
        let result = self
            .users
            .update_one(
                doc! { "guid": user_id.to_string() },
                doc! {
                    "$set": {
                        "refresh_token": refresh_token,
                        "last_login_at": now,
                        "updated_at": now,
                        "is_logged": true,
                    }
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        user_id: &UserId,
        current: &str,
        next: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<bool> {
        let now = to_bson(now);
        let result = self
            .users
            .update_one(
                doc! {
                    "guid": user_id.to_string(),
                    "refresh_token": current,
                    "is_logged": true,
                },
                doc! {
                    "$set": {
                        "refresh_token": next,
                        "last_login_at": now,
                        "updated_at": now,
                    }
                },
            )
            .await?;

        Ok(result.matched_count == 1)
    }

    async fn update_logout_state(&self, user_id: &UserId, now: DateTime<Utc>) -> AuthResult<()> {
        let result = self
            .users
            .update_one(
                doc! { "guid": user_id.to_string() },
                doc! {
                    "$set": {
                        "is_logged": false,
                        "updated_at": to_bson(now),
                    }
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<()> {
        self.users
            .delete_one(doc! { "guid": user_id.to_string() })
            .await?;
        Ok(())
    }
}

// ============================================================================
// Document Types for bson mapping
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    guid: String,
    login: String,
    name: String,
    last_name: String,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
    #[serde(default)]
    last_login_at: Option<BsonDateTime>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    is_logged: bool,
}

fn to_bson(value: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(value.timestamp_millis())
}

fn from_bson(value: BsonDateTime) -> AuthResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value.timestamp_millis())
        .ok_or_else(|| AuthError::Internal(format!("Timestamp out of range: {}", value)))
}

impl From<&UserRecord> for UserDocument {
    fn from(user: &UserRecord) -> Self {
        Self {
            guid: user.user_id.to_string(),
            login: user.login.as_str().to_string(),
            name: user.name.clone(),
            last_name: user.last_name.clone(),
            created_at: to_bson(user.created_at),
            updated_at: to_bson(user.updated_at),
            last_login_at: user.last_login_at.map(to_bson),
            refresh_token: user.refresh_token.clone(),
            is_logged: user.logged_in,
        }
    }
}

impl UserDocument {
    fn into_record(self) -> AuthResult<UserRecord> {
        let user_id: UserId = self
            .guid
            .parse()
            .map_err(|e| AuthError::Internal(format!("Invalid guid: {}", e)))?;

        Ok(UserRecord {
            user_id,
            login: Login::from_db(self.login),
            name: self.name,
            last_name: self.last_name,
            created_at: from_bson(self.created_at)?,
            updated_at: from_bson(self.updated_at)?,
            last_login_at: self.last_login_at.map(from_bson).transpose()?,
            refresh_token: self.refresh_token,
            logged_in: self.is_logged,
        })
    }
}
