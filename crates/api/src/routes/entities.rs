//! Route definitions for the `/entities` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::entities;
use crate::state::AppState;

/// Routes mounted at `/entities`.
///
/// ```text
/// GET  /         -> list_entities (?kind=)
/// POST /         -> create_entity (admin)
/// GET  /{key}    -> get_entity
/// PUT  /{key}    -> update_entity (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(entities::list_entities).post(entities::create_entity),
        )
        .route(
            "/{key}",
            get(entities::get_entity).put(entities::update_entity),
        )
}
