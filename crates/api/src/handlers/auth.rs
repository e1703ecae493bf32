//! Handlers for the `/auth` resource (login, logout, session introspection).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::auth::authenticator::ClientContext;
use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::SessionCookie;
use crate::response::{OkResponse, SessionStatus};
use crate::state::AppState;

/// Maximum stored length of a session label.
const MAX_LABEL_LEN: usize = 128;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
///
/// Fields are optional at the serde level so that a missing field is a
/// `400` with our own message rather than a deserialization rejection.
/// Deliberately not `Debug`: it carries the plaintext password.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub label: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Verify credentials and set the `admin_session` cookie.
pub async fn login(
    State(state): State<AppState>,
    client: ClientContext,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;

    let (Some(username), Some(password)) = (
        input.username.filter(|u| !u.is_empty()),
        input.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "username and password are required".into(),
        ));
    };

    let label = input
        .label
        .map(|l| l.trim().chars().take(MAX_LABEL_LEN).collect::<String>())
        .filter(|l| !l.is_empty());

    let token = state.auth.login(&username, &password, label, client).await?;
    let cookie = session_cookie(&token, state.config.secure_cookies);

    Ok(([(SET_COOKIE, cookie)], Json(OkResponse::ok())))
}

/// POST /api/v1/auth/logout
///
/// Revoke the current session and clear the cookie. 401 without an active session.
pub async fn logout(
    State(state): State<AppState>,
    cookie: SessionCookie,
) -> AppResult<impl IntoResponse> {
    state.auth.logout(cookie.as_deref()).await?;
    let cleared = clear_session_cookie(state.config.secure_cookies);

    Ok(([(SET_COOKIE, cleared)], Json(OkResponse::ok())))
}

/// GET /api/v1/auth/session
///
/// Always 200. Store failures report `authenticated: false`.
pub async fn session(State(state): State<AppState>, cookie: SessionCookie) -> Json<SessionStatus> {
    let authenticated = state.auth.introspect(cookie.as_deref()).await;
    Json(SessionStatus { authenticated })
}
