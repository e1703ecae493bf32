//! Admin session model and DTOs.

use atlas_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `admin_sessions` table.
///
/// Active iff `revoked_at` is `None`.
#[derive(Debug, Clone, FromRow)]
pub struct AdminSession {
    pub id: DbId,
    pub account_id: DbId,
    pub session_token_hash: String,
    pub created_at: Timestamp,
    pub last_seen_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub label: Option<String>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl AdminSession {
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }
}

/// DTO for creating a new admin session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub account_id: DbId,
    pub session_token_hash: String,
    pub label: Option<String>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}
