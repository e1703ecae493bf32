//! Postgres implementation of the store traits, delegating to the repositories.

use async_trait::async_trait;
use atlas_core::types::DbId;

use crate::models::account::{Account, CreateAccount};
use crate::models::content::{City, Country, CreateEntity, Entity, Page, UpdateEntity};
use crate::models::session::{AdminSession, CreateSession};
use crate::repositories::{
    AccountRepo, CityRepo, CountryRepo, EntityRepo, PageRepo, SessionRepo,
};
use crate::store::{AccountStore, ContentStore, SessionStore, StoreError, StoreLifecycle};
use crate::DbPool;

/// Store backend over a shared `PgPool`.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_account(&self, input: &CreateAccount) -> Result<Account, StoreError> {
        Ok(AccountRepo::create(&self.pool, input).await?)
    }

    async fn find_active_account(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(AccountRepo::find_active_by_username(&self.pool, username).await?)
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        Ok(AccountRepo::update_password(&self.pool, username, password_hash).await?)
    }

    async fn set_disabled(&self, username: &str, disabled: bool) -> Result<bool, StoreError> {
        Ok(AccountRepo::set_disabled(&self.pool, username, disabled).await?)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create_session(&self, input: &CreateSession) -> Result<AdminSession, StoreError> {
        Ok(SessionRepo::create(&self.pool, input).await?)
    }

    async fn find_active_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<AdminSession>, StoreError> {
        Ok(SessionRepo::find_active_by_token_hash(&self.pool, token_hash).await?)
    }

    async fn touch_session(&self, id: DbId) -> Result<(), StoreError> {
        Ok(SessionRepo::touch(&self.pool, id).await?)
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, StoreError> {
        Ok(SessionRepo::revoke_by_token_hash(&self.pool, token_hash).await?)
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn list_pages(&self) -> Result<Vec<Page>, StoreError> {
        Ok(PageRepo::list(&self.pool).await?)
    }

    async fn find_page(&self, key: &str) -> Result<Option<Page>, StoreError> {
        Ok(PageRepo::find_by_key(&self.pool, key).await?)
    }

    async fn list_entities(&self, kind: Option<&str>) -> Result<Vec<Entity>, StoreError> {
        Ok(EntityRepo::list(&self.pool, kind).await?)
    }

    async fn find_entity(&self, key: &str) -> Result<Option<Entity>, StoreError> {
        Ok(EntityRepo::find_by_key(&self.pool, key).await?)
    }

    async fn create_entity(&self, input: &CreateEntity) -> Result<Entity, StoreError> {
        Ok(EntityRepo::create(&self.pool, input).await?)
    }

    async fn update_entity(
        &self,
        key: &str,
        input: &UpdateEntity,
    ) -> Result<Option<Entity>, StoreError> {
        Ok(EntityRepo::update(&self.pool, key, input).await?)
    }

    async fn list_countries(&self) -> Result<Vec<Country>, StoreError> {
        Ok(CountryRepo::list(&self.pool).await?)
    }

    async fn find_country(&self, code: &str) -> Result<Option<Country>, StoreError> {
        Ok(CountryRepo::find_by_code(&self.pool, code).await?)
    }

    async fn list_cities(&self, country_code: &str) -> Result<Vec<City>, StoreError> {
        Ok(CityRepo::list_for_country(&self.pool, country_code).await?)
    }
}

#[async_trait]
impl StoreLifecycle for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
