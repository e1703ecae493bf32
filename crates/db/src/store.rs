//! Store traits consumed by the HTTP layer.
//!
//! The authenticator and handlers never see a pool directly. They hold
//! [`Stores`], which is built once at startup from either the Postgres
//! backend ([`crate::PgStore`]) or the in-memory backend
//! ([`crate::MemoryStore`]) and closed once on shutdown.

use std::sync::Arc;

use async_trait::async_trait;
use atlas_core::types::DbId;

use crate::models::account::{Account, CreateAccount};
use crate::models::content::{City, Country, CreateEntity, Entity, Page, UpdateEntity};
use crate::models::session::{AdminSession, CreateSession};

/// Postgres SQLSTATE for unique constraint violations.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for foreign key violations.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors surfaced by any store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate value violates unique constraint {constraint}")]
    Duplicate { constraint: String },

    /// A write referenced a row that does not exist.
    #[error("value violates foreign key constraint {constraint}")]
    InvalidReference { constraint: String },

    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Returns `true` for a duplicate on the named constraint.
    pub fn is_duplicate_on(&self, name: &str) -> bool {
        matches!(self, StoreError::Duplicate { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => return StoreError::Duplicate { constraint },
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return StoreError::InvalidReference { constraint }
                }
                _ => {}
            }
        }
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Constraint names shared by every backend.
pub mod constraints {
    pub const ACCOUNTS_USERNAME: &str = "uq_accounts_username";
    pub const SESSIONS_TOKEN_HASH: &str = "uq_admin_sessions_token_hash";
    pub const ENTITIES_KEY: &str = "uq_entities_key";
    pub const ENTITIES_COUNTRY: &str = "entities_country_code_fkey";
}

/// Credential store: admin account records.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_account(&self, input: &CreateAccount) -> Result<Account, StoreError>;

    /// Look up an account by username, ignoring disabled accounts.
    async fn find_active_account(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn update_password(&self, username: &str, password_hash: &str)
        -> Result<bool, StoreError>;

    async fn set_disabled(&self, username: &str, disabled: bool) -> Result<bool, StoreError>;
}

/// Session store: admin sessions keyed by token digest.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert an active session. Must fail with [`StoreError::Duplicate`] on
    /// [`constraints::SESSIONS_TOKEN_HASH`] if the digest was ever used.
    async fn create_session(&self, input: &CreateSession) -> Result<AdminSession, StoreError>;

    async fn find_active_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<AdminSession>, StoreError>;

    /// Set `last_seen_at` to now on an active session.
    async fn touch_session(&self, id: DbId) -> Result<(), StoreError>;

    /// Revoke the active session with this digest. Returns `false` when no
    /// active session matched.
    async fn revoke_session(&self, token_hash: &str) -> Result<bool, StoreError>;
}

/// Content store: pages, entities, countries, cities.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_pages(&self) -> Result<Vec<Page>, StoreError>;
    async fn find_page(&self, key: &str) -> Result<Option<Page>, StoreError>;

    async fn list_entities(&self, kind: Option<&str>) -> Result<Vec<Entity>, StoreError>;
    async fn find_entity(&self, key: &str) -> Result<Option<Entity>, StoreError>;
    async fn create_entity(&self, input: &CreateEntity) -> Result<Entity, StoreError>;
    async fn update_entity(
        &self,
        key: &str,
        input: &UpdateEntity,
    ) -> Result<Option<Entity>, StoreError>;

    async fn list_countries(&self) -> Result<Vec<Country>, StoreError>;
    async fn find_country(&self, code: &str) -> Result<Option<Country>, StoreError>;
    async fn list_cities(&self, country_code: &str) -> Result<Vec<City>, StoreError>;
}

/// Connection lifecycle of a backend.
#[async_trait]
pub trait StoreLifecycle: Send + Sync {
    /// Cheap reachability probe used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release pooled connections. Called once after the server stops.
    async fn close(&self);
}

/// Process-scoped bundle of store handles sharing one backend.
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub content: Arc<dyn ContentStore>,
    pub lifecycle: Arc<dyn StoreLifecycle>,
}

impl Stores {
    /// Bundle a single backend implementing every store trait.
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: AccountStore + SessionStore + ContentStore + StoreLifecycle + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            accounts: backend.clone(),
            sessions: backend.clone(),
            content: backend.clone(),
            lifecycle: backend,
        }
    }

    /// Stores backed by a Postgres pool.
    pub fn postgres(pool: crate::DbPool) -> Self {
        Self::from_backend(crate::PgStore::new(pool))
    }

    /// Stores backed by process memory (tests and local experiments).
    pub fn memory(store: crate::MemoryStore) -> Self {
        Self::from_backend(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_classify_as_unavailable() {
        let err = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(matches!(StoreError::from(err), StoreError::Unavailable(_)));
    }

    #[test]
    fn row_not_found_stays_database_error() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Database(sqlx::Error::RowNotFound)
        ));
    }

    #[test]
    fn duplicate_matches_named_constraint_only() {
        let err = StoreError::Duplicate {
            constraint: constraints::ENTITIES_KEY.to_string(),
        };
        assert!(err.is_duplicate_on(constraints::ENTITIES_KEY));
        assert!(!err.is_duplicate_on(constraints::SESSIONS_TOKEN_HASH));
    }
}
