//! Admin session lifecycle: login, per-request authentication, logout and
//! introspection.
//!
//! Raw tokens only pass through this module in memory. Every lookup goes
//! through [`TokenDigester::digest`], so the session store only ever sees
//! digests.

use std::sync::Arc;

use atlas_core::error::CoreError;
use atlas_core::session_token::{generate_session_token, is_well_formed, TokenDigester};
use atlas_core::types::DbId;
use atlas_db::models::session::{AdminSession, CreateSession};
use atlas_db::store::constraints;
use atlas_db::{AccountStore, SessionStore, Stores};

use crate::auth::password::PasswordHasher;
use crate::error::{AppError, AppResult};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MISSING_SESSION: &str = "missing session";
pub const INVALID_SESSION: &str = "invalid or revoked session";

/// Request metadata recorded on new sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// The session a request was authenticated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub account_id: DbId,
    pub session_id: DbId,
}

/// Issues, resolves and revokes admin sessions.
pub struct SessionAuthenticator {
    accounts: Arc<dyn AccountStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: Arc<PasswordHasher>,
    digester: TokenDigester,
}

impl SessionAuthenticator {
    pub fn new(stores: &Stores, hasher: Arc<PasswordHasher>, digester: TokenDigester) -> Self {
        Self {
            accounts: Arc::clone(&stores.accounts),
            sessions: Arc::clone(&stores.sessions),
            hasher,
            digester,
        }
    }

    /// Verify credentials and open a new session.
    ///
    /// Returns the raw token. Unknown, disabled and wrong-password attempts
    /// all fail with the same `Unauthorized` error. Existing sessions of the
    /// account are left alone.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        label: Option<String>,
        client: ClientContext,
    ) -> AppResult<String> {
        let Some(account) = self.accounts.find_active_account(username).await? else {
            self.burn_dummy_verify(password).await;
            tracing::info!(username, "Login rejected: no active account");
            return Err(unauthorized(INVALID_CREDENTIALS));
        };

        if !self.verify_password(&account.password_hash, password).await? {
            tracing::info!(account_id = account.id, "Login rejected: wrong password");
            return Err(unauthorized(INVALID_CREDENTIALS));
        }

        let raw_token = generate_session_token();
        let input = CreateSession {
            account_id: account.id,
            session_token_hash: self.digester.digest(&raw_token),
            label,
            client_ip: client.ip,
            user_agent: client.user_agent,
        };

        let session = self
            .sessions
            .create_session(&input)
            .await
            .map_err(|e| match e {
                e if e.is_duplicate_on(constraints::SESSIONS_TOKEN_HASH) => {
                    tracing::error!(
                        account_id = account.id,
                        "Session token digest collision, random source is not trustworthy"
                    );
                    AppError::InternalError("session token digest collision".into())
                }
                other => other.into(),
            })?;

        tracing::info!(
            account_id = account.id,
            session_id = session.id,
            "Admin session created"
        );
        Ok(raw_token)
    }

    /// Resolve a raw token to its active session.
    ///
    /// On success a `last_seen_at` update is dispatched in the background and
    /// not awaited.
    pub async fn authenticate(&self, raw_token: Option<&str>) -> AppResult<AuthenticatedSession> {
        let (_, session) = self.resolve(raw_token).await?;
        self.spawn_touch(session.id);
        Ok(AuthenticatedSession {
            account_id: session.account_id,
            session_id: session.id,
        })
    }

    /// Revoke the session identified by the raw token.
    ///
    /// The revoke is filtered by the digest just computed from the token,
    /// never by an id carried from elsewhere.
    pub async fn logout(&self, raw_token: Option<&str>) -> AppResult<()> {
        let (token_hash, session) = self.resolve(raw_token).await?;

        if self.sessions.revoke_session(&token_hash).await? {
            tracing::info!(
                account_id = session.account_id,
                session_id = session.id,
                "Admin session revoked"
            );
        } else {
            // Lost a race with a concurrent logout of the same token.
            tracing::debug!(session_id = session.id, "Session already revoked");
        }
        Ok(())
    }

    /// Whether the raw token names an active session. Never fails.
    pub async fn introspect(&self, raw_token: Option<&str>) -> bool {
        match self.resolve(raw_token).await {
            Ok(_) => true,
            Err(AppError::Core(CoreError::Unauthorized(_))) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Session introspection failed, reporting unauthenticated");
                false
            }
        }
    }

    async fn resolve(&self, raw_token: Option<&str>) -> AppResult<(String, AdminSession)> {
        let raw_token = raw_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized(MISSING_SESSION))?;

        if !is_well_formed(raw_token) {
            return Err(unauthorized(INVALID_SESSION));
        }

        let token_hash = self.digester.digest(raw_token);
        let session = self
            .sessions
            .find_active_session(&token_hash)
            .await?
            .ok_or_else(|| unauthorized(INVALID_SESSION))?;

        Ok((token_hash, session))
    }

    fn spawn_touch(&self, session_id: DbId) {
        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            if let Err(e) = sessions.touch_session(session_id).await {
                tracing::debug!(session_id, error = %e, "Failed to update session last_seen_at");
            }
        });
    }

    async fn verify_password(&self, stored_hash: &str, candidate: &str) -> AppResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let stored_hash = stored_hash.to_owned();
        let candidate = candidate.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&stored_hash, &candidate))
            .await
            .map_err(|e| AppError::InternalError(format!("Password verification task failed: {e}")))?
            .map_err(|e| AppError::InternalError(format!("Stored password hash is unusable: {e}")))
    }

    async fn burn_dummy_verify(&self, candidate: &str) {
        let hasher = Arc::clone(&self.hasher);
        let candidate = candidate.to_owned();
        if let Err(e) = tokio::task::spawn_blocking(move || hasher.verify_dummy(&candidate)).await
        {
            tracing::warn!(error = %e, "Dummy password verification task failed");
        }
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}
