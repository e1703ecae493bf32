//! Handlers for the `/entities` resource.
//!
//! Reads are public. Writes require an [`AdminSession`].

use atlas_core::error::CoreError;
use atlas_core::keys::{validate_key, validate_name};
use atlas_db::models::content::{CreateEntity, Entity, UpdateEntity};
use atlas_db::store::constraints;
use atlas_db::StoreError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /entities`.
#[derive(Debug, Deserialize)]
pub struct EntityListQuery {
    pub kind: Option<String>,
}

/// GET /api/v1/entities
pub async fn list_entities(
    State(state): State<AppState>,
    Query(query): Query<EntityListQuery>,
) -> AppResult<Json<DataResponse<Vec<Entity>>>> {
    let kind = query.kind.as_deref().filter(|k| !k.is_empty());
    let entities = state.stores.content.list_entities(kind).await?;
    Ok(Json(DataResponse { data: entities }))
}

/// GET /api/v1/entities/{key}
pub async fn get_entity(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<Entity>>> {
    let entity = state
        .stores
        .content
        .find_entity(&key)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Entity",
            key,
        })?;
    Ok(Json(DataResponse { data: entity }))
}

/// POST /api/v1/entities
///
/// Single insert; a taken key is reported by the store's unique constraint.
pub async fn create_entity(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    payload: Result<Json<CreateEntity>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Entity>>)> {
    let Json(input) = payload?;
    validate_key(&input.key)?;
    validate_name(&input.name)?;
    validate_kind(&input.kind)?;

    let entity = state
        .stores
        .content
        .create_entity(&input)
        .await
        .map_err(|e| match e {
            e if e.is_duplicate_on(constraints::ENTITIES_KEY) => AppError::Core(
                CoreError::Conflict(format!("Entity with key {} already exists", input.key)),
            ),
            other => reference_error(other, input.country_code.as_deref()),
        })?;

    tracing::info!(
        account_id = admin.account_id,
        entity_key = %entity.key,
        "Entity created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: entity })))
}

/// PUT /api/v1/entities/{key}
///
/// Partial update; the key itself is immutable.
pub async fn update_entity(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(key): Path<String>,
    payload: Result<Json<UpdateEntity>, JsonRejection>,
) -> AppResult<Json<DataResponse<Entity>>> {
    let Json(input) = payload?;
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(kind) = &input.kind {
        validate_kind(kind)?;
    }

    let entity = state
        .stores
        .content
        .update_entity(&key, &input)
        .await
        .map_err(|e| reference_error(e, input.country_code.as_deref()))?
        .ok_or(CoreError::NotFound {
            entity: "Entity",
            key,
        })?;

    tracing::info!(
        account_id = admin.account_id,
        entity_key = %entity.key,
        "Entity updated"
    );
    Ok(Json(DataResponse { data: entity }))
}

/// Kinds share the key alphabet since they are used as a query filter.
fn validate_kind(kind: &str) -> Result<(), CoreError> {
    validate_key(kind).map_err(|_| {
        CoreError::Validation(
            "kind must be 1-128 lowercase letters, digits, hyphens, or underscores".into(),
        )
    })
}

fn reference_error(err: StoreError, country_code: Option<&str>) -> AppError {
    match err {
        StoreError::InvalidReference { .. } => AppError::Core(CoreError::Validation(format!(
            "Unknown country code: {}",
            country_code.unwrap_or_default()
        ))),
        other => other.into(),
    }
}
