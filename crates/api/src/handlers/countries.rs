//! Handlers for the `/countries` resource and its nested cities.

use atlas_core::error::CoreError;
use atlas_db::models::content::{City, Country};
use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/countries
pub async fn list_countries(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Country>>>> {
    let countries = state.stores.content.list_countries().await?;
    Ok(Json(DataResponse { data: countries }))
}

/// GET /api/v1/countries/{code}
pub async fn get_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<Country>>> {
    let country = find_country(&state, code).await?;
    Ok(Json(DataResponse { data: country }))
}

/// GET /api/v1/countries/{code}/cities
///
/// 404 when the country itself is unknown, so an empty list always means a
/// country without cities.
pub async fn list_cities(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<Vec<City>>>> {
    let country = find_country(&state, code).await?;
    let cities = state.stores.content.list_cities(&country.code).await?;
    Ok(Json(DataResponse { data: cities }))
}

async fn find_country(state: &AppState, code: String) -> AppResult<Country> {
    Ok(state
        .stores
        .content
        .find_country(&code)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Country",
            key: code,
        })?)
}
