//! Cookie-based session extractors for Axum handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::authenticator::AuthenticatedSession;
use crate::auth::cookie::read_session_cookie;
use crate::error::AppError;
use crate::state::AppState;

/// The raw session token from the `admin_session` cookie, if present.
///
/// Never rejects; endpoints that tolerate anonymous callers (login,
/// introspection) inspect the `Option` themselves.
#[derive(Clone)]
pub struct SessionCookie(pub Option<String>);

impl SessionCookie {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionCookie {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SessionCookie(read_session_cookie(&parts.headers)))
    }
}

/// Requires an active admin session. Rejects with 401 otherwise.
///
/// Use this as an extractor parameter on every state-mutating admin handler:
///
/// ```ignore
/// async fn create_thing(admin: AdminSession, Json(input): Json<NewThing>) -> AppResult<...> {
///     tracing::info!(account_id = admin.0.account_id, "creating thing");
///     ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminSession(pub AuthenticatedSession);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_session_cookie(&parts.headers);
        let session = state.auth.authenticate(token.as_deref()).await?;
        parts.extensions.insert(session);
        Ok(AdminSession(session))
    }
}
