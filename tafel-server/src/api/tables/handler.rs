//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use crate::db::repository::{AreaRepository, DiningTableRepository};
use crate::utils::{AppError, AppResult};

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let tables = repo.find_all().await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Dining table {} not found", id)))?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    // 区域必须存在且启用
    let area_repo = AreaRepository::new(state.db.clone());
    let area = area_repo
        .find_by_id(&payload.area.to_string())
        .await?
        .ok_or_else(|| AppError::validation(format!("Area {} not found", payload.area)))?;
    if !area.is_active {
        return Err(AppError::validation(format!(
            "Area '{}' is not active",
            area.name
        )));
    }

    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.create(payload).await?;
    Ok(Json(table))
}

/// PUT /api/tables/:id - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    if let Some(area) = &payload.area {
        let area_repo = AreaRepository::new(state.db.clone());
        area_repo
            .find_by_id(&area.to_string())
            .await?
            .ok_or_else(|| AppError::validation(format!("Area {} not found", area)))?;
    }

    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.update(&id, payload).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
