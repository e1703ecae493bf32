//! Repository for the `accounts` table.

use sqlx::PgPool;

use crate::models::account::{Account, CreateAccount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, roles, disabled, created_at, updated_at";

/// Provides lookup and provisioning operations for admin accounts.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a new account, returning the created row.
    ///
    /// A duplicate username fails with the `uq_accounts_username` constraint.
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts (username, password_hash, roles)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(input.normalized_roles())
            .fetch_one(pool)
            .await
    }

    /// Find a non-disabled account by username (case-sensitive).
    pub async fn find_active_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM accounts WHERE username = $1 AND disabled = false");
        sqlx::query_as::<_, Account>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Replace an account's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE username = $1")
            .bind(username)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the `disabled` flag. Returns `true` if the row was updated.
    pub async fn set_disabled(
        pool: &PgPool,
        username: &str,
        disabled: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET disabled = $2 WHERE username = $1")
            .bind(username)
            .bind(disabled)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
