//! Shared response envelope types for API handlers.
//!
//! Content responses use a `{ "data": ... }` envelope. Auth endpoints return
//! the small fixed shapes below instead.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: pages }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "ok": true }` acknowledgement for login and logout.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// `{ "authenticated": bool }` returned by session introspection.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
}
