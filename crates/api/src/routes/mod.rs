pub mod auth;
pub mod countries;
pub mod entities;
pub mod health;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/logout                                     logout (requires session)
/// /auth/session                                    introspect (public)
///
/// /pages                                           list
/// /pages/{key}                                     get
///
/// /entities                                        list (?kind=), create (admin)
/// /entities/{key}                                  get, update (admin)
///
/// /countries                                       list
/// /countries/{code}                                get
/// /countries/{code}/cities                         list cities
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Admin session authentication.
        .nest("/auth", auth::router())
        // Read-only content.
        .nest("/pages", pages::router())
        .nest("/countries", countries::router())
        // Content with admin writes.
        .nest("/entities", entities::router())
}
