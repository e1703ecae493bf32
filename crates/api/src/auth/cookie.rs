//! The `admin_session` cookie.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Name of the cookie carrying the raw session token.
pub const SESSION_COOKIE_NAME: &str = "admin_session";

/// Cookie lifetime: ten years. Sessions end by revocation, not expiry.
pub const SESSION_COOKIE_MAX_AGE_SECS: u64 = 315_360_000;

/// `Set-Cookie` value that stores `token` in the browser.
pub fn session_cookie(token: &str, secure: bool) -> String {
    build(token, SESSION_COOKIE_MAX_AGE_SECS, secure)
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    build("", 0, secure)
}

fn build(value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={value}; HttpOnly; SameSite=None; Path=/; Max-Age={max_age}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Read the raw session token from the request's `Cookie` headers.
///
/// Returns `None` when the cookie is absent or empty. If the cookie appears
/// more than once, the first occurrence wins.
pub fn read_session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
