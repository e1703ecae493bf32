//! Content models: pages, entities, countries, and cities.

use atlas_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A static page row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub key: String,
    pub name: String,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An entity row from the `entities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Entity {
    pub id: DbId,
    pub key: String,
    pub name: String,
    pub kind: String,
    pub country_code: Option<String>,
    pub data: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an entity (admin only).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntity {
    pub key: String,
    pub name: String,
    pub kind: String,
    pub country_code: Option<String>,
    #[serde(default = "empty_object")]
    pub data: serde_json::Value,
}

/// DTO for updating an entity. All fields are optional; the key is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEntity {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub country_code: Option<String>,
    pub data: Option<serde_json::Value>,
}

/// A country row from the `countries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Country {
    pub id: DbId,
    pub code: String,
    pub name: String,
}

/// A city row from the `cities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: DbId,
    pub key: String,
    pub name: String,
    pub country_code: String,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
