//! Handlers for the `/pages` resource.

use atlas_core::error::CoreError;
use atlas_db::models::content::Page;
use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/pages
pub async fn list_pages(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Page>>>> {
    let pages = state.stores.content.list_pages().await?;
    Ok(Json(DataResponse { data: pages }))
}

/// GET /api/v1/pages/{key}
pub async fn get_page(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<Page>>> {
    let page = state
        .stores
        .content
        .find_page(&key)
        .await?
        .ok_or(CoreError::NotFound { entity: "Page", key })?;
    Ok(Json(DataResponse { data: page }))
}
