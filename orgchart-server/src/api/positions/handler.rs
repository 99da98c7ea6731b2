//! Position API Handlers

use axum::{Json, extract::State};

use crate::api::{ApiPath, ValidatedJson};
use crate::core::ServerState;
use crate::db::repository::position;
use crate::utils::{AppError, AppResult};
use shared::models::{Position, PositionCreate, PositionUpdate, PositionWithCount};

/// List positions with employee counts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<PositionWithCount>>> {
    Ok(Json(position::find_all(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Position>> {
    let found = position::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::position_not_found(id))?;
    Ok(Json(found))
}

pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<PositionCreate>,
) -> AppResult<Json<Position>> {
    let created = position::create(&state.pool, payload).await?;
    tracing::info!(position_id = created.id, name = %created.name, "Position created");
    Ok(Json(created))
}

pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(payload): ValidatedJson<PositionUpdate>,
) -> AppResult<Json<Position>> {
    Ok(Json(position::update(&state.pool, id, payload).await?))
}

/// Delete; employees holding the position keep existing without one
pub async fn delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<bool>> {
    let deleted = position::delete(&state.pool, id).await?;
    tracing::info!(position_id = id, "Position deleted");
    Ok(Json(deleted))
}
