use axum::routing::get;
use axum::Router;

use crate::handlers::countries;
use crate::state::AppState;

/// Routes mounted at `/countries`.
///
/// ```text
/// GET /                 -> list_countries
/// GET /{code}           -> get_country
/// GET /{code}/cities    -> list_cities
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(countries::list_countries))
        .route("/{code}", get(countries::get_country))
        .route("/{code}/cities", get(countries::list_cities))
}
