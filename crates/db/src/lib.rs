//! Persistence for Atlas: Postgres pool and migrations, row models,
//! repositories, and the store traits the HTTP layer depends on.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{AccountStore, ContentStore, SessionStore, StoreError, StoreLifecycle, Stores};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL and an explicit database name.
///
/// The name overrides any database path embedded in the URL.
pub async fn create_pool(
    database_url: &str,
    database_name: &str,
    max_connections: u32,
) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?.database(database_name);
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations, including the unique constraints the session
/// and content stores rely on.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
