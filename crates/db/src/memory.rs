//! In-process store backend.
//!
//! Mirrors the Postgres schema rules that correctness depends on (unique
//! usernames, unique session digests, unique entity keys, country references)
//! so the HTTP layer can be exercised without a database. Fault switches let
//! tests simulate an unreachable backend or failing `last_seen_at` writes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use atlas_core::types::DbId;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::account::{Account, CreateAccount};
use crate::models::content::{City, Country, CreateEntity, Entity, Page, UpdateEntity};
use crate::models::session::{AdminSession, CreateSession};
use crate::store::{
    constraints, AccountStore, ContentStore, SessionStore, StoreError, StoreLifecycle,
};

#[derive(Default)]
struct MemoryState {
    next_id: DbId,
    accounts: Vec<Account>,
    sessions: Vec<AdminSession>,
    pages: Vec<Page>,
    entities: Vec<Entity>,
    countries: Vec<Country>,
    cities: Vec<City>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn require_country(&self, code: Option<&str>) -> Result<(), StoreError> {
        match code {
            Some(code) if !self.countries.iter().any(|c| c.code == code) => {
                Err(StoreError::InvalidReference {
                    constraint: constraints::ENTITIES_COUNTRY.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[derive(Default)]
struct Faults {
    offline: AtomicBool,
    fail_touches: AtomicBool,
}

/// Store backend holding everything in memory behind a `tokio` `RwLock`.
///
/// Cheaply cloneable; clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    faults: Arc<Faults>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every operation fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.faults.offline.store(offline, Ordering::SeqCst);
    }

    /// When set, only `touch_session` fails.
    pub fn set_fail_touches(&self, fail: bool) {
        self.faults.fail_touches.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every session row, revoked ones included.
    pub async fn sessions(&self) -> Vec<AdminSession> {
        self.state.read().await.sessions.clone()
    }

    pub async fn insert_page(&self, key: &str, name: &str, body: &str) -> Page {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let page = Page {
            id: state.allocate_id(),
            key: key.to_string(),
            name: name.to_string(),
            body: body.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.pages.push(page.clone());
        page
    }

    pub async fn insert_country(&self, code: &str, name: &str) -> Country {
        let mut state = self.state.write().await;
        let country = Country {
            id: state.allocate_id(),
            code: code.to_string(),
            name: name.to_string(),
        };
        state.countries.push(country.clone());
        country
    }

    pub async fn insert_city(&self, key: &str, name: &str, country_code: &str) -> City {
        let mut state = self.state.write().await;
        let city = City {
            id: state.allocate_id(),
            key: key.to_string(),
            name: name.to_string(),
            country_code: country_code.to_string(),
        };
        state.cities.push(city.clone());
        city
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.faults.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

fn sorted_by_name_then<T, F>(mut rows: Vec<T>, fields: F) -> Vec<T>
where
    F: Fn(&T) -> (&str, &str),
{
    rows.sort_by(|a, b| fields(a).cmp(&fields(b)));
    rows
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, input: &CreateAccount) -> Result<Account, StoreError> {
        self.check_online()?;
        let mut state = self.state.write().await;
        if state.accounts.iter().any(|a| a.username == input.username) {
            return Err(StoreError::Duplicate {
                constraint: constraints::ACCOUNTS_USERNAME.to_string(),
            });
        }
        let now = Utc::now();
        let account = Account {
            id: state.allocate_id(),
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            roles: input.normalized_roles(),
            disabled: false,
            created_at: now,
            updated_at: now,
        };
        state.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_active_account(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.check_online()?;
        let state = self.state.read().await;
        Ok(state
            .accounts
            .iter()
            .find(|a| a.username == username && !a.disabled)
            .cloned())
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut state = self.state.write().await;
        match state.accounts.iter_mut().find(|a| a.username == username) {
            Some(account) => {
                account.password_hash = password_hash.to_string();
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_disabled(&self, username: &str, disabled: bool) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut state = self.state.write().await;
        match state.accounts.iter_mut().find(|a| a.username == username) {
            Some(account) => {
                account.disabled = disabled;
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, input: &CreateSession) -> Result<AdminSession, StoreError> {
        self.check_online()?;
        let mut state = self.state.write().await;
        // Uniqueness spans revoked rows too.
        if state
            .sessions
            .iter()
            .any(|s| s.session_token_hash == input.session_token_hash)
        {
            return Err(StoreError::Duplicate {
                constraint: constraints::SESSIONS_TOKEN_HASH.to_string(),
            });
        }
        let now = Utc::now();
        let session = AdminSession {
            id: state.allocate_id(),
            account_id: input.account_id,
            session_token_hash: input.session_token_hash.clone(),
            created_at: now,
            last_seen_at: now,
            revoked_at: None,
            label: input.label.clone(),
            client_ip: input.client_ip.clone(),
            user_agent: input.user_agent.clone(),
        };
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_active_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<AdminSession>, StoreError> {
        self.check_online()?;
        let state = self.state.read().await;
        Ok(state
            .sessions
            .iter()
            .find(|s| s.session_token_hash == token_hash && s.is_active())
            .cloned())
    }

    async fn touch_session(&self, id: DbId) -> Result<(), StoreError> {
        self.check_online()?;
        if self.faults.fail_touches.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("touch rejected".into()));
        }
        let mut state = self.state.write().await;
        if let Some(session) = state
            .sessions
            .iter_mut()
            .find(|s| s.id == id && s.is_active())
        {
            session.last_seen_at = Utc::now();
        }
        Ok(())
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut state = self.state.write().await;
        match state
            .sessions
            .iter_mut()
            .find(|s| s.session_token_hash == token_hash && s.is_active())
        {
            Some(session) => {
                session.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_pages(&self) -> Result<Vec<Page>, StoreError> {
        self.check_online()?;
        let pages = self.state.read().await.pages.clone();
        Ok(sorted_by_name_then(pages, |p| (p.name.as_str(), p.key.as_str())))
    }

    async fn find_page(&self, key: &str) -> Result<Option<Page>, StoreError> {
        self.check_online()?;
        let state = self.state.read().await;
        Ok(state.pages.iter().find(|p| p.key == key).cloned())
    }

    async fn list_entities(&self, kind: Option<&str>) -> Result<Vec<Entity>, StoreError> {
        self.check_online()?;
        let entities: Vec<Entity> = self
            .state
            .read()
            .await
            .entities
            .iter()
            .filter(|e| kind.is_none_or(|k| e.kind == k))
            .cloned()
            .collect();
        Ok(sorted_by_name_then(entities, |e| (e.name.as_str(), e.key.as_str())))
    }

    async fn find_entity(&self, key: &str) -> Result<Option<Entity>, StoreError> {
        self.check_online()?;
        let state = self.state.read().await;
        Ok(state.entities.iter().find(|e| e.key == key).cloned())
    }

    async fn create_entity(&self, input: &CreateEntity) -> Result<Entity, StoreError> {
        self.check_online()?;
        let mut state = self.state.write().await;
        if state.entities.iter().any(|e| e.key == input.key) {
            return Err(StoreError::Duplicate {
                constraint: constraints::ENTITIES_KEY.to_string(),
            });
        }
        state.require_country(input.country_code.as_deref())?;
        let now = Utc::now();
        let entity = Entity {
            id: state.allocate_id(),
            key: input.key.clone(),
            name: input.name.clone(),
            kind: input.kind.clone(),
            country_code: input.country_code.clone(),
            data: input.data.clone(),
            created_at: now,
            updated_at: now,
        };
        state.entities.push(entity.clone());
        Ok(entity)
    }

    async fn update_entity(
        &self,
        key: &str,
        input: &UpdateEntity,
    ) -> Result<Option<Entity>, StoreError> {
        self.check_online()?;
        let mut state = self.state.write().await;
        // A missing row wins over a bad reference: the UPDATE matches nothing
        // so the foreign key is never checked.
        let Some(index) = state.entities.iter().position(|e| e.key == key) else {
            return Ok(None);
        };
        state.require_country(input.country_code.as_deref())?;
        let entity = &mut state.entities[index];
        if let Some(name) = &input.name {
            entity.name = name.clone();
        }
        if let Some(kind) = &input.kind {
            entity.kind = kind.clone();
        }
        if let Some(country_code) = &input.country_code {
            entity.country_code = Some(country_code.clone());
        }
        if let Some(data) = &input.data {
            entity.data = data.clone();
        }
        entity.updated_at = Utc::now();
        Ok(Some(entity.clone()))
    }

    async fn list_countries(&self) -> Result<Vec<Country>, StoreError> {
        self.check_online()?;
        let countries = self.state.read().await.countries.clone();
        Ok(sorted_by_name_then(countries, |c| (c.name.as_str(), c.code.as_str())))
    }

    async fn find_country(&self, code: &str) -> Result<Option<Country>, StoreError> {
        self.check_online()?;
        let state = self.state.read().await;
        Ok(state.countries.iter().find(|c| c.code == code).cloned())
    }

    async fn list_cities(&self, country_code: &str) -> Result<Vec<City>, StoreError> {
        self.check_online()?;
        let cities: Vec<City> = self
            .state
            .read()
            .await
            .cities
            .iter()
            .filter(|c| c.country_code == country_code)
            .cloned()
            .collect();
        Ok(sorted_by_name_then(cities, |c| (c.name.as_str(), c.key.as_str())))
    }
}

#[async_trait]
impl StoreLifecycle for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn session_input(account_id: DbId, hash: &str) -> CreateSession {
        CreateSession {
            account_id,
            session_token_hash: hash.to_string(),
            label: None,
            client_ip: None,
            user_agent: None,
        }
    }

    fn account_input(username: &str) -> CreateAccount {
        CreateAccount {
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            roles: vec!["admin".to_string(), "admin".to_string()],
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        let account = store.create_account(&account_input("admin")).await.unwrap();
        assert_eq!(account.roles, vec!["admin".to_string()]);

        let err = store.create_account(&account_input("admin")).await.unwrap_err();
        assert!(err.is_duplicate_on(constraints::ACCOUNTS_USERNAME));
    }

    #[tokio::test]
    async fn disabled_accounts_are_not_active() {
        let store = MemoryStore::new();
        store.create_account(&account_input("admin")).await.unwrap();
        store.set_disabled("admin", true).await.unwrap();

        assert!(store.find_active_account("admin").await.unwrap().is_none());
        assert!(store.set_disabled("admin", false).await.unwrap());
        assert!(store.find_active_account("admin").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn session_digest_stays_unique_after_revocation() {
        let store = MemoryStore::new();
        store.create_session(&session_input(1, "digest-a")).await.unwrap();
        assert!(store.revoke_session("digest-a").await.unwrap());

        let err = store
            .create_session(&session_input(1, "digest-a"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate_on(constraints::SESSIONS_TOKEN_HASH));
    }

    #[tokio::test]
    async fn revoked_sessions_are_not_found_and_not_revoked_twice() {
        let store = MemoryStore::new();
        store.create_session(&session_input(1, "digest-b")).await.unwrap();

        assert!(store.revoke_session("digest-b").await.unwrap());
        assert!(store.find_active_session("digest-b").await.unwrap().is_none());
        assert!(!store.revoke_session("digest-b").await.unwrap());

        let rows = store.sessions().await;
        assert_eq!(rows.len(), 1, "revoked rows are kept");
        assert!(rows[0].revoked_at.is_some());
    }

    #[tokio::test]
    async fn offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_offline(true);

        assert_matches!(
            store.find_active_session("x").await,
            Err(StoreError::Unavailable(_))
        );
        assert_matches!(store.ping().await, Err(StoreError::Unavailable(_)));

        store.set_offline(false);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn entity_rules_match_schema() {
        let store = MemoryStore::new();
        store.insert_country("de", "Germany").await;

        let input = CreateEntity {
            key: "brandenburg-gate".into(),
            name: "Brandenburg Gate".into(),
            kind: "landmark".into(),
            country_code: Some("de".into()),
            data: serde_json::json!({}),
        };
        store.create_entity(&input).await.unwrap();

        let dup = store.create_entity(&input).await.unwrap_err();
        assert!(dup.is_duplicate_on(constraints::ENTITIES_KEY));

        let orphan = CreateEntity {
            key: "eiffel-tower".into(),
            country_code: Some("fr".into()),
            ..input
        };
        assert_matches!(
            store.create_entity(&orphan).await,
            Err(StoreError::InvalidReference { .. })
        );
    }

    #[tokio::test]
    async fn lists_sort_by_name_then_key() {
        let store = MemoryStore::new();
        store.insert_country("de", "Germany").await;
        store.insert_city("springfield-b", "Springfield", "de").await;
        store.insert_city("berlin", "Berlin", "de").await;
        store.insert_city("springfield-a", "Springfield", "de").await;

        let keys: Vec<String> = store
            .list_cities("de")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(keys, ["berlin", "springfield-a", "springfield-b"]);
    }
}
