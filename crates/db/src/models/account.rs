//! Admin account model and DTOs.

use atlas_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full account row from the `accounts` table.
///
/// Contains the password hash -- never serialize this to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub disabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for provisioning a new account.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

impl CreateAccount {
    /// Roles with duplicates removed, in sorted order.
    pub fn normalized_roles(&self) -> Vec<String> {
        let mut roles = self.roles.clone();
        roles.sort();
        roles.dedup();
        roles
    }
}
