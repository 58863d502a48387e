//! Area API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Area, AreaCreate, AreaUpdate, DiningTable};
use crate::db::repository::{AreaRepository, DiningTableRepository};
use crate::utils::{AppError, AppResult};

/// GET /api/areas - 获取所有区域
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Area>>> {
    let repo = AreaRepository::new(state.db.clone());
    let areas = repo.find_all().await?;
    Ok(Json(areas))
}

/// GET /api/areas/:id - 获取单个区域
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Area>> {
    let repo = AreaRepository::new(state.db.clone());
    let area = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Area {} not found", id)))?;
    Ok(Json(area))
}

/// POST /api/areas - 创建区域
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AreaCreate>,
) -> AppResult<Json<Area>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Area name must not be empty"));
    }
    let repo = AreaRepository::new(state.db.clone());
    let area = repo.create(payload).await?;
    Ok(Json(area))
}

/// PUT /api/areas/:id - 更新区域
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AreaUpdate>,
) -> AppResult<Json<Area>> {
    let repo = AreaRepository::new(state.db.clone());
    let area = repo.update(&id, payload).await?;
    Ok(Json(area))
}

/// DELETE /api/areas/:id - 删除区域 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = AreaRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}

/// GET /api/areas/:id/tables - 获取区域内的所有桌台
pub async fn list_tables(
    State(state): State<ServerState>,
    Path(area_id): Path<String>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let tables = repo.find_by_area(&area_id).await?;
    Ok(Json(tables))
}
