//! Integration tests for the admin session repository.
//!
//! Runs against a real database:
//! - Digest uniqueness across revoked rows
//! - Revocation is a one-way transition
//! - Active lookups ignore revoked rows
//! - `last_seen_at` touches

use assert_matches::assert_matches;
use atlas_db::models::account::CreateAccount;
use atlas_db::models::session::CreateSession;
use atlas_db::repositories::{AccountRepo, SessionRepo};
use atlas_db::store::constraints;
use atlas_db::{PgStore, SessionStore, StoreError};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_account(pool: &PgPool) -> i64 {
    AccountRepo::create(
        pool,
        &CreateAccount {
            username: "admin".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            roles: vec!["admin".to_string()],
        },
    )
    .await
    .expect("account insert")
    .id
}

fn new_session(account_id: i64, hash: &str) -> CreateSession {
    CreateSession {
        account_id,
        session_token_hash: hash.to_string(),
        label: Some("laptop".to_string()),
        client_ip: Some("203.0.113.9".to_string()),
        user_agent: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_session_is_active(pool: PgPool) {
    let account_id = seed_account(&pool).await;

    let session = SessionRepo::create(&pool, &new_session(account_id, "digest-a"))
        .await
        .unwrap();
    assert_eq!(session.account_id, account_id);
    assert!(session.is_active());
    assert_eq!(session.label.as_deref(), Some("laptop"));
    assert_eq!(session.created_at, session.last_seen_at);

    let found = SessionRepo::find_active_by_token_hash(&pool, "digest-a")
        .await
        .unwrap()
        .expect("active session should be found");
    assert_eq!(found.id, session.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revoke_is_one_way(pool: PgPool) {
    let account_id = seed_account(&pool).await;
    SessionRepo::create(&pool, &new_session(account_id, "digest-b"))
        .await
        .unwrap();

    assert!(SessionRepo::revoke_by_token_hash(&pool, "digest-b").await.unwrap());
    assert!(!SessionRepo::revoke_by_token_hash(&pool, "digest-b").await.unwrap());
    assert!(!SessionRepo::revoke_by_token_hash(&pool, "never-issued").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revoked_session_not_found_but_kept(pool: PgPool) {
    let account_id = seed_account(&pool).await;
    let session = SessionRepo::create(&pool, &new_session(account_id, "digest-c"))
        .await
        .unwrap();
    SessionRepo::revoke_by_token_hash(&pool, "digest-c").await.unwrap();

    assert!(SessionRepo::find_active_by_token_hash(&pool, "digest-c")
        .await
        .unwrap()
        .is_none());

    let (revoked_at,): (Option<chrono::DateTime<chrono::Utc>>,) =
        sqlx::query_as("SELECT revoked_at FROM admin_sessions WHERE id = $1")
            .bind(session.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(revoked_at.is_some(), "revoked rows are kept with a timestamp");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_digest_unique_after_revocation(pool: PgPool) {
    let account_id = seed_account(&pool).await;
    let store = PgStore::new(pool.clone());

    store
        .create_session(&new_session(account_id, "digest-d"))
        .await
        .unwrap();
    assert!(store.revoke_session("digest-d").await.unwrap());

    let err = store
        .create_session(&new_session(account_id, "digest-d"))
        .await
        .unwrap_err();
    assert_matches!(&err, StoreError::Duplicate { .. });
    assert!(err.is_duplicate_on(constraints::SESSIONS_TOKEN_HASH));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_requires_existing_account(pool: PgPool) {
    let store = PgStore::new(pool);
    let result = store.create_session(&new_session(9_999, "digest-e")).await;
    assert_matches!(result, Err(StoreError::InvalidReference { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_touch_advances_last_seen_only_while_active(pool: PgPool) {
    let account_id = seed_account(&pool).await;
    let session = SessionRepo::create(&pool, &new_session(account_id, "digest-f"))
        .await
        .unwrap();

    SessionRepo::touch(&pool, session.id).await.unwrap();
    let touched = SessionRepo::find_active_by_token_hash(&pool, "digest-f")
        .await
        .unwrap()
        .unwrap();
    assert!(touched.last_seen_at > session.last_seen_at);

    SessionRepo::revoke_by_token_hash(&pool, "digest-f").await.unwrap();
    SessionRepo::touch(&pool, session.id).await.unwrap();

    let (last_seen_at,): (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("SELECT last_seen_at FROM admin_sessions WHERE id = $1")
            .bind(session.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(last_seen_at, touched.last_seen_at);
}
