//! Repositories for the content tables (`pages`, `entities`, `countries`, `cities`).
//!
//! Every list query orders by `name, key` so responses are stable.

use sqlx::PgPool;

use crate::models::content::{City, Country, CreateEntity, Entity, Page, UpdateEntity};

const PAGE_COLUMNS: &str = "id, key, name, body, created_at, updated_at";
const ENTITY_COLUMNS: &str = "id, key, name, kind, country_code, data, created_at, updated_at";
const COUNTRY_COLUMNS: &str = "id, code, name";
const CITY_COLUMNS: &str = "id, key, name, country_code";

/// Read access to static pages.
pub struct PageRepo;

impl PageRepo {
    /// List all pages ordered by name, then key.
    pub async fn list(pool: &PgPool) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!("SELECT {PAGE_COLUMNS} FROM pages ORDER BY name, key");
        sqlx::query_as::<_, Page>(&query).fetch_all(pool).await
    }

    /// Find a page by key.
    pub async fn find_by_key(pool: &PgPool, key: &str) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {PAGE_COLUMNS} FROM pages WHERE key = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }
}

/// Read and admin-write access to entities.
pub struct EntityRepo;

impl EntityRepo {
    /// List entities ordered by name, then key, optionally filtered by kind.
    pub async fn list(pool: &PgPool, kind: Option<&str>) -> Result<Vec<Entity>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTITY_COLUMNS} FROM entities
             WHERE ($1::TEXT IS NULL OR kind = $1)
             ORDER BY name, key"
        );
        sqlx::query_as::<_, Entity>(&query)
            .bind(kind)
            .fetch_all(pool)
            .await
    }

    /// Find an entity by key.
    pub async fn find_by_key(pool: &PgPool, key: &str) -> Result<Option<Entity>, sqlx::Error> {
        let query = format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE key = $1");
        sqlx::query_as::<_, Entity>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new entity in a single statement.
    ///
    /// There is no existence pre-check: a duplicate key is reported by the
    /// `uq_entities_key` constraint.
    pub async fn create(pool: &PgPool, input: &CreateEntity) -> Result<Entity, sqlx::Error> {
        let query = format!(
            "INSERT INTO entities (key, name, kind, country_code, data)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ENTITY_COLUMNS}"
        );
        sqlx::query_as::<_, Entity>(&query)
            .bind(&input.key)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(&input.country_code)
            .bind(&input.data)
            .fetch_one(pool)
            .await
    }

    /// Update an entity. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no entity with the given key exists.
    pub async fn update(
        pool: &PgPool,
        key: &str,
        input: &UpdateEntity,
    ) -> Result<Option<Entity>, sqlx::Error> {
        let query = format!(
            "UPDATE entities SET
                name = COALESCE($2, name),
                kind = COALESCE($3, kind),
                country_code = COALESCE($4, country_code),
                data = COALESCE($5, data)
             WHERE key = $1
             RETURNING {ENTITY_COLUMNS}"
        );
        sqlx::query_as::<_, Entity>(&query)
            .bind(key)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(&input.country_code)
            .bind(&input.data)
            .fetch_optional(pool)
            .await
    }
}

/// Read access to countries.
pub struct CountryRepo;

impl CountryRepo {
    /// List all countries ordered by name, then code.
    pub async fn list(pool: &PgPool) -> Result<Vec<Country>, sqlx::Error> {
        let query = format!("SELECT {COUNTRY_COLUMNS} FROM countries ORDER BY name, code");
        sqlx::query_as::<_, Country>(&query).fetch_all(pool).await
    }

    /// Find a country by its code.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Country>, sqlx::Error> {
        let query = format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE code = $1");
        sqlx::query_as::<_, Country>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }
}

/// Read access to cities.
pub struct CityRepo;

impl CityRepo {
    /// List the cities of one country ordered by name, then key.
    pub async fn list_for_country(
        pool: &PgPool,
        country_code: &str,
    ) -> Result<Vec<City>, sqlx::Error> {
        let query = format!(
            "SELECT {CITY_COLUMNS} FROM cities WHERE country_code = $1 ORDER BY name, key"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(country_code)
            .fetch_all(pool)
            .await
    }
}
