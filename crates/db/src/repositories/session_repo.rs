//! Repository for the `admin_sessions` table.

use atlas_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{AdminSession, CreateSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, account_id, session_token_hash, created_at, last_seen_at, \
                       revoked_at, label, client_ip, user_agent";

/// Provides insert, lookup, touch, and revoke operations for admin sessions.
///
/// Rows are never deleted; revocation only sets `revoked_at`.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new active session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<AdminSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_sessions (account_id, session_token_hash, label, client_ip, user_agent)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminSession>(&query)
            .bind(input.account_id)
            .bind(&input.session_token_hash)
            .bind(&input.label)
            .bind(&input.client_ip)
            .bind(&input.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Find an active (not revoked) session by its token digest.
    pub async fn find_active_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<AdminSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_sessions
             WHERE session_token_hash = $1
               AND revoked_at IS NULL"
        );
        sqlx::query_as::<_, AdminSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Bump `last_seen_at` on an active session.
    pub async fn touch(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE admin_sessions SET last_seen_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Revoke the active session matching `token_hash`.
    ///
    /// Returns `true` if a row moved from active to revoked.
    pub async fn revoke_by_token_hash(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE admin_sessions SET revoked_at = NOW()
             WHERE session_token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
